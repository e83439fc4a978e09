//! Shared Cache Handle
//!
//! Wraps a `CacheStore` in a single cache-wide lock so it can be used from
//! several threads. Every operation holds the lock for its whole duration, so
//! no caller observes the store between its internal updates.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::{CacheStore, Counter};
use crate::error::Result;

/// Cloneable, thread-safe handle to one cache.
#[derive(Debug)]
pub struct SharedCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<CacheStore<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Ord + Clone,
    C: Clock,
{
    pub fn new(store: CacheStore<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Acquires the cache-wide lock for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, CacheStore<K, V, C>> {
        self.inner.lock()
    }

    /// Returns a copy of the value for `key`, marking it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: K, value: V, ttl_seconds: i64) {
        self.lock().set(key, value, ttl_seconds);
    }

    pub fn add(&self, key: K, value: V, ttl_seconds: i64) -> Result<()> {
        self.lock().add(key, value, ttl_seconds)
    }

    pub fn replace(&self, key: K, value: V, ttl_seconds: i64) -> Result<()> {
        self.lock().replace(key, value, ttl_seconds)
    }

    pub fn incr<Q>(&self, key: &Q, delta: i64) -> Result<Option<i64>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Counter,
    {
        self.lock().incr(key, delta)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
