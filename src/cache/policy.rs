//! Eviction Policy Module
//!
//! Decides which entry to drop when an insert would exceed capacity.

use chrono::{DateTime, Utc};

use crate::cache::slab::SlotId;

/// Entry chosen for eviction and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victim {
    /// Earliest-expiring entry, already past its expiry
    Expired(SlotId),
    /// Head of the LRU order
    LeastRecent(SlotId),
}

impl Victim {
    pub fn slot(self) -> SlotId {
        match self {
            Victim::Expired(slot) | Victim::LeastRecent(slot) => slot,
        }
    }
}

// == Choose Victim ==
/// Picks the entry to evict.
///
/// An already-expired entry always wins over the LRU head, even when the
/// expired entry was used more recently. Only the earliest expiry needs to be
/// inspected: if it is still live, no other entry can be expired.
///
/// # Arguments
/// * `earliest_expiry` - Minimum of the expiry queue, if any
/// * `least_recent` - Head of the LRU order, if any
/// * `now` - The current time of the calling operation
pub fn choose_victim(
    earliest_expiry: Option<(SlotId, DateTime<Utc>)>,
    least_recent: Option<SlotId>,
    now: DateTime<Utc>,
) -> Option<Victim> {
    match earliest_expiry {
        Some((slot, expires_at)) if now >= expires_at => Some(Victim::Expired(slot)),
        _ => least_recent.map(Victim::LeastRecent),
    }
}
