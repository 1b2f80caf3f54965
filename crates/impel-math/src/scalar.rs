// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Deterministic scalar arithmetic abstraction for the simulation core.
//!
//! Bodies, shapes, the broadphase and the contact resolver are all generic
//! over [`Scalar`], so one world definition runs on either lane:
//!
//! - [`F32Scalar`]: canonicalized `f32`; transcendentals and `sqrt` come from
//!   the pure-Rust `libm` crate instead of the host math library.
//! - [`DFix64`]: Q32.32 fixed point with saturating integer arithmetic.
//!
//! Determinism contract:
//! - Operations are pure and total over the whole domain of the lane.
//! - Equality is exact (no epsilon comparisons hidden in `==`).
//! - `to_bits` yields a canonical bit pattern, stable across platforms, that
//!   state digests and checksums are built from.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::fixed_q32_32;

/// Deterministic scalar arithmetic, square root and basic transcendentals.
pub trait Scalar:
    Copy
    + fmt::Debug
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Returns the additive identity (zero).
    fn zero() -> Self;

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Converts from `f32` into this lane, applying its canonicalization.
    fn from_f32(value: f32) -> Self;

    /// Converts to `f32` for interop and diagnostics.
    fn to_f32(self) -> f32;

    /// Square root. Negative inputs yield zero on every lane.
    fn sqrt(self) -> Self;

    /// Sine of `self` (radians).
    fn sin(self) -> Self;

    /// Cosine of `self` (radians).
    fn cos(self) -> Self;

    /// Canonical bit pattern of the value, used for hashing world state.
    fn to_bits(self) -> u64;

    /// Returns both sine and cosine of `self` (radians).
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    /// One half.
    fn half() -> Self {
        Self::from_f32(0.5)
    }

    /// Absolute value.
    fn abs(self) -> Self {
        if self < Self::zero() {
            -self
        } else {
            self
        }
    }

    /// Smaller of two values; `self` wins ties.
    fn minimum(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Larger of two values; `self` wins ties.
    fn maximum(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Restricts `self` to `[lo, hi]`.
    fn clamped(self, lo: Self, hi: Self) -> Self {
        self.maximum(lo).minimum(hi)
    }
}

/// Deterministic f32 value.
#[derive(Debug, Copy, Clone)]
pub struct F32Scalar {
    /// The wrapped f32 value
    ///
    /// # Invariant
    /// Private so every value passes through `new()`: it never holds `-0.0`,
    /// a non-canonical NaN, or a subnormal.
    value: f32,
}

#[cfg(feature = "serde")]
impl serde::Serialize for F32Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for F32Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        f32::deserialize(deserializer).map(Self::new)
    }
}

impl F32Scalar {
    /// Zero.
    pub const ZERO: Self = Self::new(0.0);

    /// One.
    pub const ONE: Self = Self::new(1.0);

    /// Wraps `num`, canonicalizing `-0.0`, NaN payloads and subnormals.
    pub const fn new(num: f32) -> Self {
        if num.is_nan() {
            Self {
                value: f32::from_bits(0x7fc0_0000),
            }
        } else if num.is_subnormal() {
            Self { value: 0.0 }
        } else {
            Self { value: num + 0.0 }
        }
    }

    /// Returns the wrapped value.
    pub const fn get(self) -> f32 {
        self.value
    }
}

impl From<f32> for F32Scalar {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl PartialEq for F32Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for F32Scalar {}

impl PartialOrd for F32Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F32Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl fmt::Display for F32Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Scalar for F32Scalar {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn from_f32(value: f32) -> Self {
        Self::new(value)
    }

    fn to_f32(self) -> f32 {
        self.value
    }

    fn sqrt(self) -> Self {
        if self.value <= 0.0 {
            return Self::ZERO;
        }
        Self::new(libm::sqrtf(self.value))
    }

    fn sin(self) -> Self {
        Self::new(libm::sinf(self.value))
    }

    fn cos(self) -> Self {
        Self::new(libm::cosf(self.value))
    }

    fn to_bits(self) -> u64 {
        u64::from(self.value.to_bits())
    }
}

impl Add for F32Scalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value)
    }
}

impl Sub for F32Scalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value)
    }
}

impl Mul for F32Scalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.value * rhs.value)
    }
}

impl Div for F32Scalar {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.value / rhs.value)
    }
}

impl Neg for F32Scalar {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value)
    }
}

/// Deterministic fixed-point scalar with Q32.32 encoding stored in an `i64`.
///
/// ```text
/// real_value = raw / 2^32
/// ```
///
/// - Addition, subtraction and negation saturate at the `i64` bounds.
/// - Multiplication and division round to nearest, ties to even.
/// - `0 / 0` is `0`; `x / 0` saturates toward the sign of `x`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DFix64 {
    raw: i64,
}

impl DFix64 {
    /// Zero.
    pub const ZERO: Self = Self { raw: 0 };

    /// One.
    pub const ONE: Self = Self {
        raw: fixed_q32_32::ONE_RAW,
    };

    /// Constructs a value from its raw Q32.32 integer (no scaling).
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    /// Constructs the exact value of integer `n`.
    #[must_use]
    pub const fn from_int(n: i32) -> Self {
        Self {
            raw: fixed_q32_32::from_int(n),
        }
    }

    /// Returns the raw Q32.32 storage value.
    pub const fn raw(self) -> i64 {
        self.raw
    }

    fn saturate(value: i128) -> i64 {
        i64::try_from(value).unwrap_or(if value.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Divides `num` by `den` (both non-negative), rounding half to even.
    fn div_round_even(num: u128, den: u128) -> u128 {
        let q = num / den;
        let r = num % den;
        let twice_r = r.saturating_mul(2);
        if twice_r > den || (twice_r == den && q & 1 == 1) {
            q.saturating_add(1)
        } else {
            q
        }
    }

    fn with_sign(magnitude: u128, negative: bool) -> i64 {
        let magnitude = i128::try_from(magnitude).unwrap_or(i128::MAX);
        Self::saturate(if negative { -magnitude } else { magnitude })
    }

    fn mul_raw(a: i64, b: i64) -> i64 {
        let prod = i128::from(a) * i128::from(b);
        let rounded = Self::div_round_even(prod.unsigned_abs(), 1_u128 << fixed_q32_32::FRAC_BITS);
        Self::with_sign(rounded, prod.is_negative())
    }

    fn div_raw(a: i64, b: i64) -> i64 {
        if b == 0 {
            return match a.cmp(&0) {
                Ordering::Equal => 0,
                Ordering::Less => i64::MIN,
                Ordering::Greater => i64::MAX,
            };
        }
        let num = u128::from(a.unsigned_abs()) << fixed_q32_32::FRAC_BITS;
        let rounded = Self::div_round_even(num, u128::from(b.unsigned_abs()));
        Self::with_sign(rounded, (a < 0) ^ (b < 0))
    }
}

impl fmt::Display for DFix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", fixed_q32_32::to_f32(self.raw))
    }
}

impl Scalar for DFix64 {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn from_f32(value: f32) -> Self {
        Self::from_raw(fixed_q32_32::from_f32(value))
    }

    fn to_f32(self) -> f32 {
        fixed_q32_32::to_f32(self.raw)
    }

    fn sqrt(self) -> Self {
        Self::from_raw(fixed_q32_32::sqrt_raw(self.raw))
    }

    fn sin(self) -> Self {
        Self::from_f32(libm::sinf(self.to_f32()))
    }

    fn cos(self) -> Self {
        Self::from_f32(libm::cosf(self.to_f32()))
    }

    fn half() -> Self {
        Self::from_raw(fixed_q32_32::ONE_RAW / 2)
    }

    fn to_bits(self) -> u64 {
        u64::from_le_bytes(self.raw.to_le_bytes())
    }
}

impl Add for DFix64 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.saturating_add(rhs.raw))
    }
}

impl Sub for DFix64 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.saturating_sub(rhs.raw))
    }
}

impl Mul for DFix64 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_raw(Self::mul_raw(self.raw, rhs.raw))
    }
}

impl Div for DFix64 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::from_raw(Self::div_raw(self.raw, rhs.raw))
    }
}

impl Neg for DFix64 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_raw(self.raw.saturating_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_lane_canonicalizes_negative_zero_and_nan() {
        assert_eq!(F32Scalar::new(-0.0).to_bits(), F32Scalar::ZERO.to_bits());
        let a = F32Scalar::new(f32::NAN);
        let b = F32Scalar::new(-f32::NAN);
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(F32Scalar::new(f32::MIN_POSITIVE / 2.0), F32Scalar::ZERO);
    }

    #[test]
    fn f32_lane_sqrt_is_total() {
        assert_eq!(F32Scalar::new(4.0).sqrt(), F32Scalar::new(2.0));
        assert_eq!(F32Scalar::new(-4.0).sqrt(), F32Scalar::ZERO);
    }

    #[test]
    fn fixed_lane_rounds_half_to_even() {
        // 1.5 * 2^-32 rounds to 2 * 2^-32 (even); 0.5 * 2^-32 rounds to 0.
        let tiny = DFix64::from_raw(1);
        let one_and_half = DFix64::from_f32(1.5);
        assert_eq!((tiny * one_and_half).raw(), 2);
        assert_eq!((tiny * DFix64::half()).raw(), 0);
    }

    #[test]
    fn fixed_lane_division_by_zero_saturates() {
        assert_eq!(DFix64::ONE / DFix64::ZERO, DFix64::from_raw(i64::MAX));
        assert_eq!(-DFix64::ONE / DFix64::ZERO, DFix64::from_raw(i64::MIN));
        assert_eq!(DFix64::ZERO / DFix64::ZERO, DFix64::ZERO);
    }

    #[test]
    fn fixed_lane_arithmetic_matches_integers() {
        let a = DFix64::from_int(6);
        let b = DFix64::from_int(-4);
        assert_eq!(a + b, DFix64::from_int(2));
        assert_eq!(a * b, DFix64::from_int(-24));
        assert_eq!(a / b, DFix64::from_f32(-1.5));
        assert_eq!(b.abs(), DFix64::from_int(4));
        assert_eq!(DFix64::from_int(16).sqrt(), DFix64::from_int(4));
    }

    #[test]
    fn helpers_break_ties_toward_self() {
        let a = F32Scalar::new(1.0);
        let b = F32Scalar::new(2.0);
        assert_eq!(a.minimum(b), a);
        assert_eq!(a.maximum(b), b);
        assert_eq!(F32Scalar::new(5.0).clamped(a, b), b);
        assert_eq!(F32Scalar::new(-5.0).clamped(a, b), a);
    }
}
