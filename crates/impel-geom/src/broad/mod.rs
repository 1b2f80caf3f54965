// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Broad-phase contract and implementations.

use impel_math::Scalar;

use crate::ident::{ColliderHandle, ColliderPair};
use crate::types::aabb::Aabb;

/// Brute-force baseline.
pub mod all_pairs;
/// Loose quadtree.
pub mod quadtree;

/// One collider's bounds for the current frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColliderAabb<S> {
    /// Collider the bounds belong to.
    pub collider: ColliderHandle,
    /// World-space bounds.
    pub aabb: Aabb<S>,
}

impl<S: Scalar> ColliderAabb<S> {
    /// Pairs a collider with its bounds.
    #[must_use]
    pub const fn new(collider: ColliderHandle, aabb: Aabb<S>) -> Self {
        Self { collider, aabb }
    }
}

/// Per-frame spatial index fed by the world during broad-phase resolution.
///
/// The world drives an implementation through one fixed sequence each step:
/// [`clear`](Self::clear), [`set_world_bound`](Self::set_world_bound), one
/// [`insert`](Self::insert) per active non-plane collider,
/// [`calculate_pairs`](Self::calculate_pairs), then
/// [`possible_pairs`](Self::possible_pairs).
///
/// Contract:
/// - Every two inserted colliders whose bounds overlap (inclusive on faces)
///   appear in the candidate list. False positives are allowed.
/// - No pair appears twice and no collider is paired with itself, provided
///   each collider was inserted once.
/// - For identical input sequences the candidate list is identical, order
///   included.
pub trait BroadPhase<S: Scalar> {
    /// Forgets every inserted collider and the previous candidate list.
    fn clear(&mut self);
    /// Region that encloses this frame's colliders.
    fn set_world_bound(&mut self, bound: Aabb<S>);
    /// Adds one collider for this frame.
    fn insert(&mut self, entry: ColliderAabb<S>);
    /// Builds the candidate list from everything inserted since `clear`.
    fn calculate_pairs(&mut self);
    /// Candidates from the last `calculate_pairs`.
    fn possible_pairs(&self) -> &[ColliderPair];
}

impl<S: Scalar, B: BroadPhase<S> + ?Sized> BroadPhase<S> for &mut B {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_world_bound(&mut self, bound: Aabb<S>) {
        (**self).set_world_bound(bound);
    }

    fn insert(&mut self, entry: ColliderAabb<S>) {
        (**self).insert(entry);
    }

    fn calculate_pairs(&mut self) {
        (**self).calculate_pairs();
    }

    fn possible_pairs(&self) -> &[ColliderPair] {
        (**self).possible_pairs()
    }
}

impl<S: Scalar, B: BroadPhase<S> + ?Sized> BroadPhase<S> for Box<B> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_world_bound(&mut self, bound: Aabb<S>) {
        (**self).set_world_bound(bound);
    }

    fn insert(&mut self, entry: ColliderAabb<S>) {
        (**self).insert(entry);
    }

    fn calculate_pairs(&mut self) {
        (**self).calculate_pairs();
    }

    fn possible_pairs(&self) -> &[ColliderPair] {
        (**self).possible_pairs()
    }
}
