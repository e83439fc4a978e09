//! Expiry Queue Module
//!
//! Min-heap of entry expiry times with lazy invalidation.
//!
//! Each insert stamps the item with a fresh generation, recorded per slot in a
//! side table. Removing or re-inserting a slot only updates the side table;
//! the superseded heap item stays behind as stale and is discarded when it
//! reaches the top. Costs:
//! - insert: O(log n)
//! - remove: O(1), plus amortized O(log n) when the stale item is popped
//! - peek_min / pop_min: amortized O(log n)
//!
//! The heap is rebuilt without stale items once they outnumber live ones, so
//! its size stays within a constant factor of the number of TTL entries.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::cache::slab::SlotId;

/// Heaps smaller than this are never compacted.
const COMPACT_THRESHOLD: usize = 64;

// Field order is the ordering: expiry first, then key as a deterministic
// tie-break. Generation and slot only separate stale copies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ExpiryItem<K> {
    expires_at: DateTime<Utc>,
    key: K,
    generation: u64,
    slot: SlotId,
}

// == Expiry Queue ==
/// Orders TTL entries by `(expires_at, key)` ascending.
#[derive(Debug)]
pub struct ExpiryQueue<K> {
    heap: BinaryHeap<Reverse<ExpiryItem<K>>>,
    /// Generation of the live item for each slot, `None` = not queued
    live: Vec<Option<u64>>,
    live_len: usize,
    next_generation: u64,
}

impl<K: Ord + Clone> ExpiryQueue<K> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: Vec::new(),
            live_len: 0,
            next_generation: 0,
        }
    }

    // == Insert ==
    /// Queues a slot to expire at `expires_at`.
    ///
    /// A slot that is already queued is repositioned.
    pub fn insert(&mut self, slot: SlotId, key: K, expires_at: DateTime<Utc>) {
        if slot >= self.live.len() {
            self.live.resize(slot + 1, None);
        }
        if self.live[slot].is_none() {
            self.live_len += 1;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.live[slot] = Some(generation);
        self.heap.push(Reverse(ExpiryItem {
            expires_at,
            key,
            generation,
            slot,
        }));
        self.maybe_compact();
    }

    // == Remove ==
    /// Dequeues a slot. Returns false if it was not queued.
    pub fn remove(&mut self, slot: SlotId) -> bool {
        match self.live.get_mut(slot).and_then(Option::take) {
            Some(_) => {
                self.live_len -= 1;
                self.maybe_compact();
                true
            }
            None => false,
        }
    }

    // == Peek Min ==
    /// Returns the slot with the earliest expiry without dequeuing it.
    pub fn peek_min(&mut self) -> Option<(SlotId, DateTime<Utc>)> {
        self.discard_stale();
        self.heap.peek().map(|Reverse(item)| (item.slot, item.expires_at))
    }

    // == Pop Min ==
    /// Dequeues and returns the slot with the earliest expiry.
    pub fn pop_min(&mut self) -> Option<(SlotId, DateTime<Utc>)> {
        self.discard_stale();
        let Reverse(item) = self.heap.pop()?;
        self.live[item.slot] = None;
        self.live_len -= 1;
        Some((item.slot, item.expires_at))
    }

    // == Length ==
    /// Returns the number of queued (live) slots.
    pub fn len(&self) -> usize {
        self.live_len
    }

    pub fn is_empty(&self) -> bool {
        self.live_len == 0
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        matches!(self.live.get(slot), Some(Some(_)))
    }

    fn is_live(&self, item: &ExpiryItem<K>) -> bool {
        self.live.get(item.slot).copied().flatten() == Some(item.generation)
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if self.is_live(top) {
                break;
            }
            self.heap.pop();
        }
    }

    fn maybe_compact(&mut self) {
        if self.heap.len() < COMPACT_THRESHOLD || self.heap.len() <= 2 * self.live_len {
            return;
        }
        let before = self.heap.len();
        let live = &self.live;
        self.heap.retain(|Reverse(item)| {
            live.get(item.slot).copied().flatten() == Some(item.generation)
        });
        trace!(before, after = self.heap.len(), "compacted expiry queue");
    }

    #[cfg(test)]
    pub(crate) fn heap_len(&self) -> usize {
        self.heap.len()
    }
}

impl<K: Ord + Clone> Default for ExpiryQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
