//! Cache Store Module
//!
//! Main cache engine combining the entry store with LRU tracking and TTL
//! expiration. Every operation leaves the three structures consistent:
//! - a key is stored iff its slot is tracked exactly once by the LRU tracker
//! - a slot is in the expiry queue iff its entry has an expiry
//! - the store never holds more than `max_size` entries

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::expiry::ExpiryQueue;
use crate::cache::policy::{self, Victim};
use crate::cache::slab::{EntryStore, SlotId};
use crate::cache::{CacheEntry, Counter, LruTracker};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded cache with expiry-first, then LRU, eviction.
///
/// Expiry is enforced lazily: an expired entry keeps its capacity slot until
/// it is accessed or chosen for eviction.
#[derive(Debug)]
pub struct CacheStore<K, V, C = SystemClock> {
    /// Key-value storage
    entries: EntryStore<K, V>,
    /// LRU access tracker
    lru: LruTracker,
    /// Entries with a TTL, earliest expiry first
    expiry: ExpiryQueue<K>,
    /// Maximum number of entries allowed
    max_size: NonZeroUsize,
    clock: C,
}

impl<K, V> CacheStore<K, V, SystemClock>
where
    K: Hash + Eq + Ord + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_size` entries.
    pub fn new(max_size: NonZeroUsize) -> Self {
        Self::with_clock(max_size, SystemClock)
    }
}

impl<K, V, C> CacheStore<K, V, C>
where
    K: Hash + Eq + Ord + Clone,
    C: Clock,
{
    /// Creates a new CacheStore that reads time from `clock`.
    pub fn with_clock(max_size: NonZeroUsize, clock: C) -> Self {
        Self {
            entries: EntryStore::with_capacity(max_size.get()),
            lru: LruTracker::new(),
            expiry: ExpiryQueue::new(),
            max_size,
            clock,
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let slot = self.live_slot(key, now)?;
        self.lru.touch(slot);
        self.entries.get(slot).map(|entry| &entry.value)
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for the key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds, `0` = never expires; a negative TTL
    ///   stores an entry that is already expired
    pub fn set(&mut self, key: K, value: V, ttl_seconds: i64) {
        let now = self.clock.now();
        match self.entries.slot_of(&key) {
            Some(slot) => self.update_slot(slot, value, ttl_seconds, now),
            None => self.insert_new(key, value, ttl_seconds, now),
        }
    }

    // == Add ==
    /// Stores a value only if no live entry exists for the key.
    ///
    /// An expired entry for the key is removed first and does not block the
    /// add.
    pub fn add(&mut self, key: K, value: V, ttl_seconds: i64) -> Result<()> {
        let now = self.clock.now();
        if self.live_slot(&key, now).is_some() {
            return Err(CacheError::NotStored(
                "add on a key that already holds a live entry".to_string(),
            ));
        }
        self.insert_new(key, value, ttl_seconds, now);
        Ok(())
    }

    // == Replace ==
    /// Stores a value only if a live entry already exists for the key.
    pub fn replace(&mut self, key: K, value: V, ttl_seconds: i64) -> Result<()> {
        let now = self.clock.now();
        let slot = self.live_slot(&key, now).ok_or_else(|| {
            CacheError::NotStored("replace on a missing or expired key".to_string())
        })?;
        self.update_slot(slot, value, ttl_seconds, now);
        Ok(())
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unvisited included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size.get()
    }

    /// Checks whether an entry is stored for `key` without touching it.
    ///
    /// Does not check expiry, so an expired entry still counts.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains(key)
    }

    // == Internal Helpers ==

    /// Resolves `key` to its slot, deleting the entry if it has expired.
    fn live_slot<Q>(&mut self, key: &Q, now: DateTime<Utc>) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.entries.slot_of(key)?;
        let expired = self
            .entries
            .get(slot)
            .is_some_and(|entry| entry.is_expired(now));
        if expired {
            trace!(slot, "removing expired entry on access");
            self.delete_slot(slot);
            return None;
        }
        Some(slot)
    }

    /// Overwrites an existing entry in place and marks it most recently used.
    fn update_slot(&mut self, slot: SlotId, value: V, ttl_seconds: i64, now: DateTime<Utc>) {
        let Some(entry) = self.entries.get_mut(slot) else {
            return;
        };
        entry.update(value, ttl_seconds, now);
        let expires_at = entry.expires_at;

        match expires_at {
            Some(expires_at) => {
                if let Some(key) = self.entries.key(slot).cloned() {
                    self.expiry.insert(slot, key, expires_at);
                }
            }
            None => {
                self.expiry.remove(slot);
            }
        }
        self.lru.touch(slot);
    }

    /// Inserts an entry for a key that is not stored, evicting first if full.
    fn insert_new(&mut self, key: K, value: V, ttl_seconds: i64, now: DateTime<Utc>) {
        if self.entries.len() >= self.max_size.get() {
            self.evict_one(now);
        }

        let entry = CacheEntry::new(value, ttl_seconds, now);
        let expires_at = entry.expires_at;
        let slot = match expires_at {
            Some(expires_at) => {
                let slot = self.entries.insert(key.clone(), entry);
                self.expiry.insert(slot, key, expires_at);
                slot
            }
            None => self.entries.insert(key, entry),
        };
        self.lru.touch(slot);

        assert!(
            self.entries.len() <= self.max_size.get(),
            "cache holds {} entries, above max_size {}",
            self.entries.len(),
            self.max_size
        );
    }

    /// Frees one capacity slot according to the eviction policy.
    fn evict_one(&mut self, now: DateTime<Utc>) {
        let earliest = self.expiry.peek_min();
        let Some(victim) = policy::choose_victim(earliest, self.lru.peek_oldest(), now) else {
            return;
        };

        match victim {
            Victim::Expired(slot) => debug!(slot, "evicting expired entry"),
            Victim::LeastRecent(slot) => debug!(slot, "evicting least recently used entry"),
        }
        self.delete_slot(victim.slot());
    }

    /// Removes a slot from all three structures.
    fn delete_slot(&mut self, slot: SlotId) -> Option<(K, CacheEntry<V>)> {
        self.lru.remove(slot);
        self.expiry.remove(slot);
        self.entries.remove(slot)
    }

    /// Panics if the entry store, LRU tracker and expiry queue disagree.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&mut self) {
        assert!(self.entries.len() <= self.max_size.get(), "capacity exceeded");
        assert_eq!(self.entries.len(), self.lru.len(), "store and LRU sizes differ");

        let mut lru_slots: Vec<SlotId> = self.lru.iter().collect();
        assert_eq!(lru_slots.len(), self.lru.len(), "LRU list length mismatch");
        lru_slots.sort_unstable();
        lru_slots.dedup();
        assert_eq!(lru_slots.len(), self.lru.len(), "slot tracked twice in LRU");

        let mut ttl_entries = 0;
        let mut earliest: Option<(DateTime<Utc>, &K)> = None;
        for (slot, key, entry) in self.entries.iter() {
            assert!(self.lru.contains(slot), "stored slot missing from LRU");
            assert_eq!(
                entry.expires_at.is_some(),
                self.expiry.contains(slot),
                "expiry queue membership mismatch"
            );
            if let Some(expires_at) = entry.expires_at {
                ttl_entries += 1;
                if earliest.map_or(true, |min| (expires_at, key) < min) {
                    earliest = Some((expires_at, key));
                }
            }
        }
        assert_eq!(ttl_entries, self.expiry.len(), "expiry queue size mismatch");

        let expected = earliest.map(|(expires_at, key)| (self.entries.slot_of(key), expires_at));
        let actual = self.expiry.peek_min().map(|(slot, expires_at)| (Some(slot), expires_at));
        assert_eq!(actual, expected, "expiry queue minimum mismatch");
    }
}

impl<K, V, C> CacheStore<K, V, C>
where
    K: Hash + Eq + Ord + Clone,
    V: Counter,
    C: Clock,
{
    // == Increment ==
    /// Adds `delta` to an integer value and returns the new value.
    ///
    /// Returns `Ok(None)` for a missing or expired key without creating it.
    /// The stored value is rewritten with no TTL, like a plain `set`. On a
    /// non-integer value or overflow the entry is left unchanged.
    pub fn incr<Q>(&mut self, key: &Q, delta: i64) -> Result<Option<i64>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let Some(slot) = self.live_slot(key, now) else {
            return Ok(None);
        };
        self.lru.touch(slot);

        let current = match self.entries.get(slot) {
            Some(entry) => entry.value.to_integer()?,
            None => return Ok(None),
        };
        let updated = current
            .checked_add(delta)
            .ok_or_else(|| CacheError::Overflow(format!("{current} + {delta}")))?;

        self.update_slot(slot, V::from_integer(updated), 0, now);
        Ok(Some(updated))
    }
}
