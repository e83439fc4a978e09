//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A single cached value and its optional expiry.
///
/// Recency is not stored here; it is implied by the entry's position in the
/// LRU tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration time, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds, `0` = never expires
    /// * `now` - The current time of the calling operation
    pub fn new(value: V, ttl_seconds: i64, now: DateTime<Utc>) -> Self {
        Self {
            value,
            expires_at: expiry_from_ttl(ttl_seconds, now),
        }
    }

    // == Update ==
    /// Replaces the value and resets the expiry from a fresh TTL.
    pub fn update(&mut self, value: V, ttl_seconds: i64, now: DateTime<Utc>) {
        self.value = value;
        self.expires_at = expiry_from_ttl(ttl_seconds, now);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so an
    /// entry stored with a non-positive TTL is expired immediately.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Converts a memcached-style TTL into an absolute expiry.
///
/// `0` means no expiry. Any other value, negative ones included, is an
/// offset in seconds from `now`.
pub fn expiry_from_ttl(ttl_seconds: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if ttl_seconds == 0 {
        return None;
    }
    let expires = Duration::try_seconds(ttl_seconds).and_then(|offset| now.checked_add_signed(offset));
    Some(expires.unwrap_or(if ttl_seconds > 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    }))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_no_ttl() {
        let now = Utc::now();
        let entry = CacheEntry::new("test_value".to_string(), 0, now);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let now = Utc::now();
        let entry = CacheEntry::new("test_value".to_string(), 60, now);

        assert_eq!(entry.expires_at, Some(now + Duration::seconds(60)));
        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::seconds(60)));
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, -1, now);

        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let entry = CacheEntry {
            value: "test",
            expires_at: Some(now),
        };

        assert!(entry.is_expired(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_update_clears_ttl() {
        let now = Utc::now();
        let mut entry = CacheEntry::new("a", 10, now);

        entry.update("b", 0, now);

        assert_eq!(entry.value, "b");
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let now = Utc::now();
        let expires = expiry_from_ttl(i64::MAX, now).unwrap();
        assert_eq!(expires, DateTime::<Utc>::MAX_UTC);

        let expires = expiry_from_ttl(i64::MIN, now).unwrap();
        assert!(expires < now);
    }
}
