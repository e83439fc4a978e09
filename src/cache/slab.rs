//! Entry Store Module
//!
//! Owns every cache entry. Entries live in a slot arena and a hash index maps
//! each key to its slot. The LRU tracker and expiry queue refer to entries by
//! slot id only, so removing an entry here cannot leave them holding a
//! dangling reference to entry data.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::CacheEntry;

/// Stable handle to an occupied slot.
pub type SlotId = usize;

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    entry: CacheEntry<V>,
}

// == Entry Store ==
/// Key to entry mapping with O(1) lookup, insert and remove.
#[derive(Debug)]
pub struct EntryStore<K, V> {
    /// Key to slot index
    index: HashMap<K, SlotId>,
    /// Entry arena, `None` = vacant
    slots: Vec<Option<Slot<K, V>>>,
    /// Vacant slot ids available for reuse
    free: Vec<SlotId>,
}

impl<K, V> EntryStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    // == Contains ==
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Slot Lookup ==
    /// Returns the slot holding `key`, if any.
    pub fn slot_of<Q>(&self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub fn get(&self, slot: SlotId) -> Option<&CacheEntry<V>> {
        self.slots
            .get(slot)
            .and_then(|s| s.as_ref())
            .map(|s| &s.entry)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut CacheEntry<V>> {
        self.slots
            .get_mut(slot)
            .and_then(|s| s.as_mut())
            .map(|s| &mut s.entry)
    }

    pub fn key(&self, slot: SlotId) -> Option<&K> {
        self.slots
            .get(slot)
            .and_then(|s| s.as_ref())
            .map(|s| &s.key)
    }

    // == Insert ==
    /// Stores an entry under `key` and returns its slot.
    ///
    /// If the key is already present its entry is replaced in place and the
    /// existing slot is returned.
    pub fn insert(&mut self, key: K, entry: CacheEntry<V>) -> SlotId {
        if let Some(slot) = self.slot_of(&key) {
            if let Some(occupied) = self.slots[slot].as_mut() {
                occupied.entry = entry;
            }
            return slot;
        }

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(Slot {
                    key: key.clone(),
                    entry,
                });
                slot
            }
            None => {
                self.slots.push(Some(Slot {
                    key: key.clone(),
                    entry,
                }));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        slot
    }

    // == Remove ==
    /// Vacates a slot, returning its key and entry.
    pub fn remove(&mut self, slot: SlotId) -> Option<(K, CacheEntry<V>)> {
        let vacated = self.slots.get_mut(slot)?.take()?;
        self.index.remove(&vacated.key);
        self.free.push(slot);
        Some((vacated.key, vacated.entry))
    }

    // == Length ==
    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &K, &CacheEntry<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().map(|s| (id, &s.key, &s.entry)))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(value: &str) -> CacheEntry<String> {
        CacheEntry::new(value.to_string(), 0, Utc::now())
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store = EntryStore::with_capacity(4);

        let slot = store.insert("a".to_string(), entry("1"));

        assert!(store.contains("a"));
        assert_eq!(store.slot_of("a"), Some(slot));
        assert_eq!(store.get(slot).unwrap().value, "1");
        assert_eq!(store.key(slot).map(String::as_str), Some("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_existing_key_keeps_slot() {
        let mut store = EntryStore::with_capacity(4);

        let first = store.insert("a".to_string(), entry("1"));
        let second = store.insert("a".to_string(), entry("2"));

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(first).unwrap().value, "2");
    }

    #[test]
    fn test_remove_frees_slot_for_reuse() {
        let mut store = EntryStore::with_capacity(4);

        let a = store.insert("a".to_string(), entry("1"));
        store.insert("b".to_string(), entry("2"));

        let (key, removed) = store.remove(a).unwrap();
        assert_eq!(key, "a");
        assert_eq!(removed.value, "1");
        assert!(!store.contains("a"));
        assert!(store.get(a).is_none());

        let c = store.insert("c".to_string(), entry("3"));
        assert_eq!(c, a, "vacant slot should be reused");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_vacant_slot() {
        let mut store: EntryStore<String, String> = EntryStore::with_capacity(4);
        assert!(store.remove(0).is_none());

        let a = store.insert("a".to_string(), entry("1"));
        store.remove(a);
        assert!(store.remove(a).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut store = EntryStore::with_capacity(4);
        let slot = store.insert(1u32, CacheEntry::new(10, 0, Utc::now()));

        store.get_mut(slot).unwrap().value = 11;

        assert_eq!(store.get(slot).unwrap().value, 11);
        assert_eq!(store.iter().count(), 1);
    }
}
