//! Mini Memcache - A bounded in-process key/value cache
//!
//! Provides a memcached-style operation set (get, set, add, replace, incr)
//! with TTL expiration and LRU eviction. Already-expired entries are evicted
//! before live ones.

pub mod cache;
pub mod config;
pub mod error;
pub mod workload;

pub use cache::{CacheStore, SharedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use workload::{run_workload, WorkloadReport};
