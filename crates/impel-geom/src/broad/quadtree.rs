// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::mem;

use impel_math::Scalar;
use thiserror::Error;
use tracing::{trace, warn};

use super::{BroadPhase, ColliderAabb};
use crate::ident::ColliderPair;
use crate::types::aabb::Aabb;

/// Deepest tree accepted by [`QuadTreeConfig::validate`].
///
/// A full tree of this depth preallocates about 350k nodes.
pub const MAX_SUPPORTED_DEPTH: usize = 10;

/// Shape of a [`QuadTree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuadTreeConfig {
    /// Number of levels, root included.
    pub max_depth: usize,
    /// Entries a leaf holds before it splits.
    pub max_size: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self { max_depth: 7, max_size: 8 }
    }
}

/// Rejected [`QuadTreeConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuadTreeConfigError {
    /// A tree needs at least its root level.
    #[error("quadtree max_depth must be at least 1")]
    ZeroDepth,
    /// Leaves must hold at least one entry.
    #[error("quadtree max_size must be at least 1")]
    ZeroBucket,
    /// Preallocation would be unreasonably large.
    #[error("quadtree max_depth {0} exceeds the supported maximum of {MAX_SUPPORTED_DEPTH}")]
    TooDeep(usize),
}

impl QuadTreeConfig {
    /// Checks the limits.
    ///
    /// # Errors
    /// Returns the first limit that is out of range.
    pub const fn validate(&self) -> Result<(), QuadTreeConfigError> {
        if self.max_depth == 0 {
            return Err(QuadTreeConfigError::ZeroDepth);
        }
        if self.max_size == 0 {
            return Err(QuadTreeConfigError::ZeroBucket);
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(QuadTreeConfigError::TooDeep(self.max_depth));
        }
        Ok(())
    }

    /// Node count of a complete tree: `(4^d - 1) / 3`.
    #[must_use]
    pub const fn node_capacity(&self) -> usize {
        let mut total = 0;
        let mut level = 1;
        let mut depth = 0;
        while depth < self.max_depth {
            total += level;
            level *= 4;
            depth += 1;
        }
        total
    }
}

/// One cell of a [`QuadTree`].
#[derive(Debug, Clone)]
pub struct QuadNode<S> {
    bound: Aabb<S>,
    children: Option<[usize; 4]>,
    entries: Vec<ColliderAabb<S>>,
}

impl<S: Scalar> QuadNode<S> {
    fn empty(capacity: usize) -> Self {
        Self { bound: Aabb::default(), children: None, entries: Vec::with_capacity(capacity) }
    }

    /// Region covered by this node.
    #[must_use]
    pub fn bound(&self) -> Aabb<S> {
        self.bound
    }

    /// Arena indices of the four children, bottom-left first and then
    /// counter-clockwise, once the node has split.
    #[must_use]
    pub fn children(&self) -> Option<[usize; 4]> {
        self.children
    }

    /// Entries stored at this node.
    #[must_use]
    pub fn entries(&self) -> &[ColliderAabb<S>] {
        &self.entries
    }
}

/// Loose quadtree broad phase over a preallocated node arena.
///
/// Every node for a complete tree of `max_depth` levels is allocated once, up
/// front; a bump cursor hands them out during splits and `clear` rewinds it.
/// After warm-up a frame performs no allocation beyond entry-list growth.
///
/// Placement: an entry descends into a child only when its bounds overlap
/// exactly one of the four children. Entries on a split line, or outside the
/// node entirely, stay where they are. A leaf that reaches `max_size` entries
/// splits unless it is on the deepest level, in which case it keeps growing
/// and the insertion is counted as an overflow.
///
/// Pairs: entries sharing a node are paired with each other and every entry is
/// paired with every entry below it. Only pairs whose bounds overlap are kept.
/// Two entries in sibling subtrees are separated by a split line, so no
/// overlapping pair is lost.
#[derive(Debug, Clone)]
pub struct QuadTree<S> {
    config: QuadTreeConfig,
    nodes: Vec<QuadNode<S>>,
    cursor: usize,
    pairs: Vec<ColliderPair>,
    scratch: Vec<ColliderAabb<S>>,
    overflow: usize,
}

impl<S: Scalar> QuadTree<S> {
    /// Allocates the full node arena for `config`.
    ///
    /// # Errors
    /// Returns [`QuadTreeConfigError`] when `config` is out of range.
    pub fn new(config: QuadTreeConfig) -> Result<Self, QuadTreeConfigError> {
        config.validate()?;
        Ok(Self::allocate(config))
    }

    fn allocate(config: QuadTreeConfig) -> Self {
        let nodes = (0..config.node_capacity()).map(|_| QuadNode::empty(config.max_size)).collect();
        Self {
            config,
            nodes,
            cursor: 1,
            pairs: Vec::new(),
            scratch: Vec::with_capacity(config.max_size),
            overflow: 0,
        }
    }

    /// Limits this tree was built with.
    #[must_use]
    pub const fn config(&self) -> QuadTreeConfig {
        self.config
    }

    /// Nodes handed out since the last clear, root included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.cursor
    }

    /// Insertions since the last clear that landed in a full leaf which could
    /// not split.
    #[must_use]
    pub const fn overflow_count(&self) -> usize {
        self.overflow
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &QuadNode<S> {
        &self.nodes[0]
    }

    /// Node at `index` in the arena, if it has been handed out.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&QuadNode<S>> {
        self.nodes[..self.cursor].get(index)
    }

    fn insert_at(&mut self, mut node: usize, mut level: usize, entry: ColliderAabb<S>) {
        loop {
            if let Some(children) = self.nodes[node].children {
                match self.single_overlapping_child(children, &entry.aabb) {
                    Some(child) => {
                        node = child;
                        level += 1;
                        continue;
                    }
                    None => {
                        self.nodes[node].entries.push(entry);
                        return;
                    }
                }
            }

            if self.nodes[node].entries.len() < self.config.max_size {
                self.nodes[node].entries.push(entry);
                return;
            }

            if level + 1 < self.config.max_depth && self.cursor + 4 <= self.nodes.len() {
                self.split(node, level);
                continue;
            }

            self.overflow += 1;
            if self.overflow == 1 {
                warn!(
                    node,
                    level,
                    max_size = self.config.max_size,
                    "quadtree leaf full at maximum depth; entries will exceed max_size"
                );
            }
            self.nodes[node].entries.push(entry);
            return;
        }
    }

    fn split(&mut self, node: usize, level: usize) {
        let bound = self.nodes[node].bound;
        let first = self.cursor;
        self.cursor += 4;
        let children = [first, first + 1, first + 2, first + 3];
        for (quadrant, &child) in children.iter().enumerate() {
            self.nodes[child].bound = bound.quadrant(quadrant);
        }
        self.nodes[node].children = Some(children);
        trace!(node, level, first_child = first, "quadtree split");

        let mut moved = mem::take(&mut self.scratch);
        moved.append(&mut self.nodes[node].entries);
        for entry in moved.drain(..) {
            self.insert_at(node, level, entry);
        }
        self.scratch = moved;
    }

    fn single_overlapping_child(&self, children: [usize; 4], aabb: &Aabb<S>) -> Option<usize> {
        let mut found = None;
        for child in children {
            if self.nodes[child].bound.overlaps(aabb) {
                if found.is_some() {
                    return None;
                }
                found = Some(child);
            }
        }
        found
    }

    fn pair_node(nodes: &[QuadNode<S>], node: usize, pairs: &mut Vec<ColliderPair>) {
        let current = &nodes[node];
        for (i, a) in current.entries.iter().enumerate() {
            for b in &current.entries[i + 1..] {
                push_if_overlapping(pairs, a, b);
            }
            if let Some(children) = current.children {
                for child in children {
                    Self::pair_with_subtree(nodes, child, a, pairs);
                }
            }
        }
        if let Some(children) = current.children {
            for child in children {
                Self::pair_node(nodes, child, pairs);
            }
        }
    }

    fn pair_with_subtree(
        nodes: &[QuadNode<S>],
        node: usize,
        entry: &ColliderAabb<S>,
        pairs: &mut Vec<ColliderPair>,
    ) {
        let current = &nodes[node];
        for other in &current.entries {
            push_if_overlapping(pairs, entry, other);
        }
        if let Some(children) = current.children {
            for child in children {
                Self::pair_with_subtree(nodes, child, entry, pairs);
            }
        }
    }
}

fn push_if_overlapping<S: Scalar>(
    pairs: &mut Vec<ColliderPair>,
    a: &ColliderAabb<S>,
    b: &ColliderAabb<S>,
) {
    if a.aabb.overlaps(&b.aabb) {
        pairs.push(ColliderPair::new(a.collider, b.collider));
    }
}

impl<S: Scalar> Default for QuadTree<S> {
    fn default() -> Self {
        Self::allocate(QuadTreeConfig::default())
    }
}

impl<S: Scalar> BroadPhase<S> for QuadTree<S> {
    fn clear(&mut self) {
        for node in &mut self.nodes[..self.cursor] {
            node.entries.clear();
            node.children = None;
        }
        self.cursor = 1;
        self.pairs.clear();
        self.overflow = 0;
    }

    fn set_world_bound(&mut self, bound: Aabb<S>) {
        self.nodes[0].bound = bound;
    }

    fn insert(&mut self, entry: ColliderAabb<S>) {
        self.insert_at(0, 0, entry);
    }

    fn calculate_pairs(&mut self) {
        self.pairs.clear();
        Self::pair_node(&self.nodes, 0, &mut self.pairs);
        trace!(nodes = self.cursor, pairs = self.pairs.len(), "quadtree pairs");
    }

    fn possible_pairs(&self) -> &[ColliderPair] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use super::*;
    use crate::ident::ColliderHandle;
    use impel_math::{F32Scalar, Vec2};

    type V = Vec2<F32Scalar>;

    fn entry(id: i32, cx: f32, cy: f32, h: f32) -> ColliderAabb<F32Scalar> {
        ColliderAabb::new(
            ColliderHandle::new(id),
            Aabb::from_center(V::from_f32(cx, cy), V::from_f32(h, h)),
        )
    }

    fn tree(max_depth: usize, max_size: usize) -> QuadTree<F32Scalar> {
        QuadTree::new(QuadTreeConfig { max_depth, max_size }).expect("valid config")
    }

    #[test]
    fn capacity_matches_complete_tree() {
        assert_eq!(QuadTreeConfig { max_depth: 1, max_size: 1 }.node_capacity(), 1);
        assert_eq!(QuadTreeConfig { max_depth: 3, max_size: 1 }.node_capacity(), 21);
        assert_eq!(QuadTreeConfig::default().node_capacity(), 5461);
    }

    #[test]
    fn rejects_bad_limits() {
        let bad = |max_depth, max_size| QuadTree::<F32Scalar>::new(QuadTreeConfig { max_depth, max_size });
        assert_eq!(bad(0, 4).err(), Some(QuadTreeConfigError::ZeroDepth));
        assert_eq!(bad(3, 0).err(), Some(QuadTreeConfigError::ZeroBucket));
        assert_eq!(bad(11, 4).err(), Some(QuadTreeConfigError::TooDeep(11)));
    }

    #[test]
    fn full_leaf_splits_and_redistributes() {
        let mut qt = tree(3, 2);
        qt.clear();
        qt.set_world_bound(Aabb::new(V::from_f32(-8.0, -8.0), V::from_f32(8.0, 8.0)));
        qt.insert(entry(0, -4.0, -4.0, 0.5));
        qt.insert(entry(1, 4.0, 4.0, 0.5));
        assert_eq!(qt.node_count(), 1);
        qt.insert(entry(2, 4.0, -4.0, 0.5));
        assert_eq!(qt.node_count(), 5);
        let root = qt.root();
        assert!(root.entries().is_empty());
        let [bl, br, tr, tl] = root.children().expect("root split");
        let ids = |n: usize| -> Vec<i32> {
            qt.node(n).expect("live node").entries().iter().map(|e| e.collider.raw()).collect()
        };
        assert_eq!(ids(bl), vec![0]);
        assert_eq!(ids(br), vec![2]);
        assert_eq!(ids(tr), vec![1]);
        assert!(ids(tl).is_empty());
    }

    #[test]
    fn straddling_entry_stays_at_parent() {
        let mut qt = tree(3, 1);
        qt.clear();
        qt.set_world_bound(Aabb::new(V::from_f32(-8.0, -8.0), V::from_f32(8.0, 8.0)));
        qt.insert(entry(0, -4.0, -4.0, 0.5));
        qt.insert(entry(1, 0.0, 3.0, 1.0));
        let root = qt.root();
        assert_eq!(root.entries().len(), 1);
        assert_eq!(root.entries()[0].collider, ColliderHandle::new(1));
    }

    #[test]
    fn depth_cap_overflows_instead_of_splitting() {
        let mut qt = tree(2, 1);
        qt.clear();
        qt.set_world_bound(Aabb::new(V::from_f32(0.0, 0.0), V::from_f32(8.0, 8.0)));
        for id in 0..4 {
            qt.insert(entry(id, 1.0, 1.0, 0.1));
        }
        assert_eq!(qt.node_count(), 5);
        assert_eq!(qt.overflow_count(), 3);
        qt.calculate_pairs();
        assert_eq!(qt.possible_pairs().len(), 6);
        qt.clear();
        assert_eq!(qt.overflow_count(), 0);
        assert_eq!(qt.node_count(), 1);
        assert!(qt.root().children().is_none());
    }

    #[test]
    fn parent_entries_pair_with_descendants() {
        let mut qt = tree(4, 1);
        qt.clear();
        qt.set_world_bound(Aabb::new(V::from_f32(-8.0, -8.0), V::from_f32(8.0, 8.0)));
        qt.insert(entry(0, -6.0, -6.0, 0.5));
        qt.insert(entry(1, 0.0, 0.0, 7.0));
        qt.insert(entry(2, -5.5, -5.5, 0.5));
        qt.insert(entry(3, 6.0, 6.0, 0.5));
        qt.calculate_pairs();
        let mut got: Vec<(i32, i32)> = qt
            .possible_pairs()
            .iter()
            .map(|p| {
                let (a, b) = p.canonical();
                (a.raw(), b.raw())
            })
            .collect();
        got.sort_unstable();
        assert_eq!(got, vec![(0, 1), (0, 2), (1, 2), (1, 3)]);
    }
}
