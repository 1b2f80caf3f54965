// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_math::{Scalar, Vec2};

use super::aabb::Aabb;

/// Circle in world coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle<S> {
    /// Centre point.
    pub center: Vec2<S>,
    /// Radius; expected to be non-negative.
    pub radius: S,
}

impl<S: Scalar> Circle<S> {
    /// Creates a circle.
    #[must_use]
    pub const fn new(center: Vec2<S>, radius: S) -> Self {
        Self { center, radius }
    }

    /// Tight bounding box.
    #[must_use]
    pub fn aabb(&self) -> Aabb<S> {
        Aabb::from_center(self.center, Vec2::splat(self.radius))
    }

    /// `true` when `point` is inside or on the circle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2<S>) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impel_math::F32Scalar;

    #[test]
    fn aabb_is_tight() {
        let c = Circle::new(Vec2::<F32Scalar>::from_f32(1.0, -1.0), F32Scalar::new(0.5));
        let b = c.aabb();
        assert_eq!(b.min().to_f32_array(), [0.5, -1.5]);
        assert_eq!(b.max().to_f32_array(), [1.5, -0.5]);
        assert!(c.contains_point(Vec2::from_f32(1.5, -1.0)));
        assert!(!c.contains_point(Vec2::from_f32(1.5, -0.5)));
    }
}
