//! Time-boxed memo of whether the LLM backend is reachable.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dressday_core::Clock;
use parking_lot::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AvailabilityEntry {
    available: bool,
    expires_at: DateTime<Utc>,
}

/// Last probe result, valid until its TTL runs out. Concurrent writers race
/// and the last write wins.
pub struct AvailabilityCache {
    entry: RwLock<Option<AvailabilityEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl AvailabilityCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
            clock,
        }
    }

    /// Cached availability, or `None` once expired or never probed
    pub fn get(&self) -> Option<bool> {
        let now = self.clock.now();
        let entry = *self.entry.read();
        entry
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.available)
    }

    pub fn set(&self, available: bool) {
        // Saturates so a far-future TTL means "until restart"
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        *self.entry.write() = Some(AvailabilityEntry {
            available,
            expires_at,
        });
    }

    pub fn reset(&self) {
        *self.entry.write() = None;
    }
}
