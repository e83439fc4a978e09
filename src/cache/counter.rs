//! Counter Values
//!
//! Value types that `incr` can treat as integers.

use crate::error::{CacheError, Result};

/// A cached value that can be read and written as an `i64`.
pub trait Counter: Sized {
    /// Reads the value as an integer, or fails with `CacheError::ValueType`.
    fn to_integer(&self) -> Result<i64>;

    fn from_integer(n: i64) -> Self;
}

/// Decimal text, as memcached stores counters.
impl Counter for String {
    fn to_integer(&self) -> Result<i64> {
        self.trim()
            .parse()
            .map_err(|_| CacheError::ValueType(self.clone()))
    }

    fn from_integer(n: i64) -> Self {
        n.to_string()
    }
}

impl Counter for i64 {
    fn to_integer(&self) -> Result<i64> {
        Ok(*self)
    }

    fn from_integer(n: i64) -> Self {
        n
    }
}
