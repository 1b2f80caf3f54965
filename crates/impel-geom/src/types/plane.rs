// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_math::{Scalar, Vec2};

/// Infinite line through a body's anchor, described by its normal.
///
/// Planes only widen the world bound; they take no part in pair tests.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane<S> {
    /// Direction the plane faces. A zero normal marks an uninitialised plane.
    pub normal: Vec2<S>,
}

impl<S: Scalar> Plane<S> {
    /// Creates a plane facing `normal`.
    #[must_use]
    pub const fn new(normal: Vec2<S>) -> Self {
        Self { normal }
    }

    /// `true` when the normal is zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec2::zero()
    }
}

impl<S: Scalar> Default for Plane<S> {
    fn default() -> Self {
        Self::new(Vec2::zero())
    }
}
