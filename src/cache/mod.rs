//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and LRU eviction.

mod clock;
mod counter;
mod entry;
mod expiry;
mod lru;
mod policy;
mod shared;
mod slab;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::Counter;
pub use entry::{expiry_from_ttl, CacheEntry};
pub use expiry::ExpiryQueue;
pub use lru::LruTracker;
pub use policy::{choose_victim, Victim};
pub use shared::SharedCache;
pub use slab::{EntryStore, SlotId};
pub use store::CacheStore;
