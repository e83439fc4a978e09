//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror. A cache miss is not an
//! error; lookups report it as `None`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// `add` on a live key, or `replace` on a missing or expired key
    #[error("Not stored: {0}")]
    NotStored(String),

    /// `incr` on a value that does not parse as an integer
    #[error("Value is not an integer: {0}")]
    ValueType(String),

    /// `incr` result does not fit in an i64
    #[error("Increment overflow: {0}")]
    Overflow(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
