// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw helpers for the Q32.32 fixed-point encoding behind [`crate::DFix64`].
//!
//! A raw `i64` stores the real value scaled by `2^32`:
//! `real_value = raw / 2^32`. Conversions only use exact or
//! correctly-rounded IEEE-754 operations, so they are bit-identical on every
//! supported target.

/// Number of fractional bits in the Q32.32 encoding.
pub const FRAC_BITS: u32 = 32;

/// Raw value of `1.0`.
pub const ONE_RAW: i64 = 1_i64 << FRAC_BITS;

const SCALE_F64: f64 = 4_294_967_296.0;

/// Converts an `f32` to a raw Q32.32 value.
///
/// - `NaN` maps to `0`.
/// - `±∞` and out-of-range magnitudes saturate to `i64::MAX` / `i64::MIN`.
/// - Fractions below the Q32.32 resolution round to nearest, ties to even.
pub fn from_f32(value: f32) -> i64 {
    if value.is_nan() {
        return 0;
    }
    // f32 -> f64 and the power-of-two scale are both exact.
    let scaled = (f64::from(value) * SCALE_F64).round_ties_even();
    // `as` saturates at the i64 bounds.
    #[allow(clippy::cast_possible_truncation)]
    let raw = scaled as i64;
    raw
}

/// Converts a raw Q32.32 value to the nearest `f32`.
pub fn to_f32(raw: i64) -> f32 {
    if raw == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let value = (raw as f64 / SCALE_F64) as f32;
    value
}

/// Raw value of the integer `n`.
#[allow(clippy::cast_lossless)]
pub const fn from_int(n: i32) -> i64 {
    (n as i64) << FRAC_BITS
}

/// Square root of a raw Q32.32 value, rounded down at the Q32.32 resolution.
///
/// Negative inputs have no real root and yield `0`.
pub fn sqrt_raw(raw: i64) -> i64 {
    if raw <= 0 {
        return 0;
    }
    // sqrt(raw / 2^32) * 2^32 == sqrt(raw * 2^32)
    let widened = u128::from(raw.unsigned_abs()) << FRAC_BITS;
    let root = isqrt_u128(widened);
    // raw < 2^63 so root < 2^48: always representable.
    i64::try_from(root).unwrap_or(i64::MAX)
}

fn isqrt_u128(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Start from a power of two that is >= sqrt(n); Newton then decreases
    // monotonically to floor(sqrt(n)).
    let bits = 128 - n.leading_zeros();
    let mut x = 1_u128 << bits.div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}
