// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_math::Scalar;

use super::{BroadPhase, ColliderAabb};
use crate::ident::ColliderPair;
use crate::types::aabb::Aabb;

/// Brute-force broad phase testing every inserted pair.
///
/// `O(n^2)` per frame. It exists as a correctness baseline: the quadtree must
/// report a superset of what this reports, and small scenes that do not
/// benefit from spatial partitioning can use it directly.
///
/// Pairs are emitted in insertion order: `(i, j)` for `i < j`, with the
/// earlier-inserted collider first.
#[derive(Debug, Clone)]
pub struct AllPairs<S> {
    entries: Vec<ColliderAabb<S>>,
    pairs: Vec<ColliderPair>,
}

impl<S: Scalar> AllPairs<S> {
    /// Creates an empty baseline.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new(), pairs: Vec::new() }
    }

    /// Entries inserted since the last clear.
    #[must_use]
    pub fn entries(&self) -> &[ColliderAabb<S>] {
        &self.entries
    }
}

impl<S: Scalar> Default for AllPairs<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scalar> BroadPhase<S> for AllPairs<S> {
    fn clear(&mut self) {
        self.entries.clear();
        self.pairs.clear();
    }

    fn set_world_bound(&mut self, _bound: Aabb<S>) {}

    fn insert(&mut self, entry: ColliderAabb<S>) {
        self.entries.push(entry);
    }

    fn calculate_pairs(&mut self) {
        self.pairs.clear();
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if a.aabb.overlaps(&b.aabb) {
                    self.pairs.push(ColliderPair::new(a.collider, b.collider));
                }
            }
        }
    }

    fn possible_pairs(&self) -> &[ColliderPair] {
        &self.pairs
    }
}
