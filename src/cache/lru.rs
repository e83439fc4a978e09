//! LRU Tracker Module
//!
//! Implements Least Recently Used ordering for cache eviction.

use crate::cache::slab::SlotId;

const NIL: SlotId = SlotId::MAX;

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: SlotId,
    next: SlotId,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// A doubly linked list threaded through slot ids:
/// - Head = Least recently used
/// - Tail = Most recently used
///
/// Because every link is addressed by slot id, touch and remove are O(1)
/// without searching for the key.
#[derive(Debug)]
pub struct LruTracker {
    /// Per-slot links, `None` = slot not tracked
    links: Vec<Option<Link>>,
    head: SlotId,
    tail: SlotId,
    len: usize,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Touch ==
    /// Marks a slot as most recently used.
    ///
    /// Tracked slots are unlinked first, new slots are simply appended.
    pub fn touch(&mut self, slot: SlotId) {
        self.remove(slot);
        if slot >= self.links.len() {
            self.links.resize(slot + 1, None);
        }

        self.links[slot] = Some(Link {
            prev: self.tail,
            next: NIL,
        });
        match self.link_mut(self.tail) {
            Some(tail) => tail.next = slot,
            None => self.head = slot,
        }
        self.tail = slot;
        self.len += 1;
    }

    // == Remove ==
    /// Stops tracking a slot. Returns false if it was not tracked.
    pub fn remove(&mut self, slot: SlotId) -> bool {
        let Some(link) = self.links.get_mut(slot).and_then(Option::take) else {
            return false;
        };

        match self.link_mut(link.prev) {
            Some(prev) => prev.next = link.next,
            None => self.head = link.next,
        }
        match self.link_mut(link.next) {
            Some(next) => next.prev = link.prev,
            None => self.tail = link.prev,
        }
        self.len -= 1;
        true
    }

    // == Peek Oldest ==
    /// Returns the least recently used slot without removing it.
    pub fn peek_oldest(&self) -> Option<SlotId> {
        (self.head != NIL).then_some(self.head)
    }

    // == Length ==
    /// Returns the number of tracked slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Contains ==
    pub fn contains(&self, slot: SlotId) -> bool {
        matches!(self.links.get(slot), Some(Some(_)))
    }

    /// Iterates from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            if cursor == NIL {
                return None;
            }
            let current = cursor;
            cursor = self.links[current].map_or(NIL, |l| l.next);
            Some(current)
        })
    }

    fn link_mut(&mut self, slot: SlotId) -> Option<&mut Link> {
        self.links.get_mut(slot).and_then(Option::as_mut)
    }
}

impl Default for LruTracker {
    fn default() -> Self {
        Self::new()
    }
}
