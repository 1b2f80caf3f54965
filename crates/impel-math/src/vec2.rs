// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::scalar::Scalar;
use crate::EPSILON;

/// Deterministic 2D vector over a [`Scalar`] lane.
///
/// * Components are world-space metres and may encode points or directions
///   depending on the calling context.
/// * The axis helpers follow the usual math convention: `up()` is `+Y`,
///   `right()` is `+X`.
/// * Fields are public so embedding layers can read and write state with plain
///   field access.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2<S> {
    /// Horizontal component.
    pub x: S,
    /// Vertical component.
    pub y: S,
}

impl<S: Scalar> Vec2<S> {
    /// Creates a vector from components.
    pub const fn new(x: S, y: S) -> Self {
        Self { x, y }
    }

    /// Creates a vector from `f32` components through the lane's canonicalization.
    pub fn from_f32(x: f32, y: f32) -> Self {
        Self::new(S::from_f32(x), S::from_f32(y))
    }

    /// Returns the components as `f32`.
    pub fn to_f32_array(self) -> [f32; 2] {
        [self.x.to_f32(), self.y.to_f32()]
    }

    /// Both components set to `value`.
    pub fn splat(value: S) -> Self {
        Self::new(value, value)
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::splat(S::zero())
    }

    /// `(1, 1)`.
    pub fn one() -> Self {
        Self::splat(S::one())
    }

    /// `(0, 1)`.
    pub fn up() -> Self {
        Self::new(S::zero(), S::one())
    }

    /// `(0, -1)`.
    pub fn down() -> Self {
        Self::new(S::zero(), -S::one())
    }

    /// `(-1, 0)`.
    pub fn left() -> Self {
        Self::new(-S::one(), S::zero())
    }

    /// `(1, 0)`.
    pub fn right() -> Self {
        Self::new(S::one(), S::zero())
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> S {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise product.
    pub fn hadamard(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Squared magnitude.
    pub fn length_squared(self) -> S {
        self.dot(self)
    }

    /// Magnitude.
    pub fn length(self) -> S {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` when the length is at or
    /// below [`EPSILON`] and no direction can be recovered.
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len <= S::from_f32(EPSILON) {
            return None;
        }
        Some(self / len)
    }

    /// Unit vector in the same direction, or `fallback` for degenerate input.
    pub fn normalize_or(self, fallback: Self) -> Self {
        self.try_normalize().unwrap_or(fallback)
    }

    /// Rotates counter-clockwise by `angle` radians.
    pub fn rotate(self, angle: S) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }

    /// Clockwise perpendicular `(y, -x)`.
    pub fn perpendicular(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    pub fn perpendicular_ccw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Component-wise absolute value.
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Component-wise clamp of `self` into `[min, max]`.
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::new(self.x.clamped(min.x, max.x), self.y.clamped(min.y, max.y))
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.minimum(other.x), self.y.minimum(other.y))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.maximum(other.x), self.y.maximum(other.y))
    }
}

impl<S: Scalar> Default for Vec2<S> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<S: Scalar> Add for Vec2<S> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<S: Scalar> AddAssign for Vec2<S> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<S: Scalar> Sub for Vec2<S> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<S: Scalar> SubAssign for Vec2<S> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<S: Scalar> Neg for Vec2<S> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<S: Scalar> Mul<S> for Vec2<S> {
    type Output = Self;
    fn mul(self, rhs: S) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<S: Scalar> MulAssign<S> for Vec2<S> {
    fn mul_assign(&mut self, rhs: S) {
        *self = *self * rhs;
    }
}

impl<S: Scalar> Div<S> for Vec2<S> {
    type Output = Self;
    fn div(self, rhs: S) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}
