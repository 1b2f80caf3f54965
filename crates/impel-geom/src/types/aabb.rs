// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_math::{Scalar, Vec2};

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components. Every
///   constructor orders its inputs per axis, so the invariant cannot be broken
///   from outside the type.
/// - Overlap and containment tests are inclusive on faces.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<S> {
    min: Vec2<S>,
    max: Vec2<S>,
}

impl<S: Scalar> Aabb<S> {
    /// Builds the box spanned by two corners, in any order.
    #[must_use]
    pub fn new(a: Vec2<S>, b: Vec2<S>) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Builds a box centred at `center`. Negative half-extents are mirrored.
    #[must_use]
    pub fn from_center(center: Vec2<S>, half_extents: Vec2<S>) -> Self {
        let he = half_extents.abs();
        Self { min: center - he, max: center + he }
    }

    /// Degenerate box containing just `point`.
    #[must_use]
    pub fn from_point(point: Vec2<S>) -> Self {
        Self { min: point, max: point }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2<S>>,
    {
        let mut iter = points.into_iter();
        let first = Self::from_point(iter.next()?);
        Some(iter.fold(first, |acc, p| acc.include_point(p)))
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec2<S> {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec2<S> {
        self.max
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec2<S> {
        (self.min + self.max) * S::half()
    }

    /// Half of the box size on each axis.
    #[must_use]
    pub fn half_extents(&self) -> Vec2<S> {
        (self.max - self.min) * S::half()
    }

    /// Returns `true` if this box overlaps `other` (inclusive on faces).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Returns `true` if `other` lies entirely inside this box.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, point: Vec2<S>) -> bool {
        self.min.x <= point.x && point.x <= self.max.x && self.min.y <= point.y && point.y <= self.max.y
    }

    /// Point of the box nearest to `point`; `point` itself when inside.
    #[must_use]
    pub fn closest_point(&self, point: Vec2<S>) -> Vec2<S> {
        point.clamp(self.min, self.max)
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Smallest box containing this box and `point`.
    #[must_use]
    pub fn include_point(&self, point: Vec2<S>) -> Self {
        Self { min: self.min.min(point), max: self.max.max(point) }
    }

    /// Grows the box by `margin` on every side. Shrinking stops at the centre.
    #[must_use]
    pub fn inflate(&self, margin: S) -> Self {
        Self::from_center(self.center(), self.half_extents() + Vec2::splat(margin))
    }

    /// Box covering one quarter of this box.
    ///
    /// Quadrants are numbered counter-clockwise starting bottom-left:
    /// `0` bottom-left, `1` bottom-right, `2` top-right, `3` top-left.
    /// Indices are taken modulo four.
    #[must_use]
    pub fn quadrant(&self, index: usize) -> Self {
        let c = self.center();
        match index % 4 {
            0 => Self { min: self.min, max: c },
            1 => Self { min: Vec2::new(c.x, self.min.y), max: Vec2::new(self.max.x, c.y) },
            2 => Self { min: c, max: self.max },
            _ => Self { min: Vec2::new(self.min.x, c.y), max: Vec2::new(c.x, self.max.y) },
        }
    }
}

impl<S: Scalar> Default for Aabb<S> {
    fn default() -> Self {
        Self::from_point(Vec2::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impel_math::F32Scalar;

    type B = Aabb<F32Scalar>;
    type V = Vec2<F32Scalar>;

    #[test]
    fn constructor_orders_corners() {
        let b = B::new(V::from_f32(2.0, -1.0), V::from_f32(-3.0, 4.0));
        assert_eq!(b.min(), V::from_f32(-3.0, -1.0));
        assert_eq!(b.max(), V::from_f32(2.0, 4.0));
        assert_eq!(b.center(), V::from_f32(-0.5, 1.5));
        assert_eq!(b.half_extents(), V::from_f32(2.5, 2.5));
    }

    #[test]
    fn touching_faces_overlap() {
        let a = B::from_center(V::zero(), V::one());
        let b = B::from_center(V::from_f32(2.0, 0.0), V::one());
        let c = B::from_center(V::from_f32(2.5, 0.0), V::one());
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let b = B::new(V::zero(), V::from_f32(4.0, 2.0));
        let q: Vec<B> = (0..4).map(|i| b.quadrant(i)).collect();
        assert_eq!(q[0], B::new(V::zero(), V::from_f32(2.0, 1.0)));
        assert_eq!(q[1], B::new(V::from_f32(2.0, 0.0), V::from_f32(4.0, 1.0)));
        assert_eq!(q[2], B::new(V::from_f32(2.0, 1.0), V::from_f32(4.0, 2.0)));
        assert_eq!(q[3], B::new(V::from_f32(0.0, 1.0), V::from_f32(2.0, 2.0)));
        let joined = q.iter().skip(1).fold(q[0], |acc, x| acc.union(x));
        assert_eq!(joined, b);
    }

    #[test]
    fn enclosing_and_closest_point() {
        assert_eq!(B::enclosing(core::iter::empty()), None);
        let pts = [V::from_f32(1.0, 5.0), V::from_f32(-2.0, 0.0), V::from_f32(3.0, 1.0)];
        let b = B::enclosing(pts).unwrap_or_default();
        assert_eq!(b, B::new(V::from_f32(-2.0, 0.0), V::from_f32(3.0, 5.0)));
        assert_eq!(b.closest_point(V::from_f32(10.0, -4.0)), V::from_f32(3.0, 0.0));
        assert!(b.contains_point(V::from_f32(3.0, 5.0)));
        assert!(b.contains(&B::from_center(V::from_f32(0.0, 2.0), V::one())));
    }
}
