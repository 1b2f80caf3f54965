// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::cmp::Reverse;
use std::collections::BinaryHeap;

/// Dense slot storage with index recycling.
///
/// Released slots keep their storage (overwritten with a caller-supplied
/// tombstone) so indices stay stable. Allocation always reuses the lowest
/// released index before appending, which matches a first-free scan without
/// paying for it.
#[derive(Debug, Clone)]
pub(crate) struct SlotArena<T> {
    items: Vec<T>,
    live: Vec<bool>,
    free: BinaryHeap<Reverse<usize>>,
}

impl<T> SlotArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity), live: Vec::with_capacity(capacity), free: BinaryHeap::new() }
    }

    /// Stores `value` and returns its index.
    pub(crate) fn allocate(&mut self, value: T) -> usize {
        if let Some(Reverse(index)) = self.free.pop() {
            self.items[index] = value;
            self.live[index] = true;
            return index;
        }
        self.items.push(value);
        self.live.push(true);
        self.items.len() - 1
    }

    /// Replaces a live slot with `tombstone` and queues it for reuse.
    /// Returns `false` when the slot was already free or never existed.
    pub(crate) fn release(&mut self, index: usize, tombstone: T) -> bool {
        match self.live.get_mut(index) {
            Some(live) if *live => {
                *live = false;
                self.items[index] = tombstone;
                self.free.push(Reverse(index));
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_live(&self, index: usize) -> bool {
        self.live.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if self.is_live(index) {
            self.items.get(index)
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.is_live(index) {
            self.items.get_mut(index)
        } else {
            None
        }
    }

    /// Every slot, free ones included, in index order.
    pub(crate) fn slots(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Live slots with their indices, in index order.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.items.iter().enumerate().filter(|(i, _)| self.live[*i])
    }

    pub(crate) fn live_count(&self) -> usize {
        self.items.len() - self.free.len()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.live.clear();
        self.free.clear();
    }
}
