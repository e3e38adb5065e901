//! Cache Statistics Module
//!
//! Snapshot of store occupancy plus operation counters.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries physically present, including stale ones not yet swept
    pub total: usize,
    /// Entries present whose expiry has passed
    pub expired: usize,
    /// `total - expired`
    pub active: usize,
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Calls to `set`
    pub sets: u64,
    /// Entries removed by prefix invalidation
    pub invalidations: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Counters ==
/// Running operation tally kept by the store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub invalidations: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_invalidations(&mut self, removed: usize) {
        self.invalidations += removed as u64;
    }
}
