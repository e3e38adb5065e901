//! Cache Store Module
//!
//! Main cache engine: a HashMap of entries with lazy TTL expiry and
//! prefix invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats};
use crate::clock::{Clock, SystemClock};

// == Cache Store ==
/// Single-owner TTL store. Wrap it in [`SharedCache`](crate::cache::SharedCache)
/// to share it across threads.
///
/// Expired entries are only removed when observed by `get`/`remove` or by an
/// explicit `purge_expired`/`invalidate_prefix`/`clear`. Nothing else evicts,
/// so memory grows with the number of distinct keys.
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
    /// Lookup counters
    counters: Counters,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store that reads the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            counters: Counters::default(),
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.counters.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.counters.record_miss();
                None
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry and its TTL.
    ///
    /// `ttl_secs <= 0` stores the value permanently.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_secs: i64) {
        let entry = CacheEntry::new(value, ttl_secs, self.clock.now());
        self.entries.insert(key.into(), entry);
        self.counters.record_set();
    }

    // == Remove ==
    /// Drops a single key, returning its value if it was still live.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();
        self.entries
            .remove(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value)
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Plain case-sensitive string prefix, no wildcards. An empty prefix
    /// removes everything. Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        self.counters.record_invalidations(removed);

        debug!(prefix, removed, "Invalidated cache prefix");
        removed
    }

    // == Clear ==
    /// Empties the store. Counters are kept.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        debug!(removed, "Cleared cache");
    }

    // == Stats ==
    /// Returns a snapshot of the store. Does not sweep expired entries.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let total = self.entries.len();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        CacheStats {
            total,
            expired,
            active: total - expired,
            hits: self.counters.hits,
            misses: self.counters.misses,
            sets: self.counters.sets,
            invalidations: self.counters.invalidations,
        }
    }

    // == Reset Counters ==
    /// Zeroes the operation counters.
    pub fn reset_counters(&mut self) {
        self.counters = Counters::default();
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        debug!(removed, "Purged expired cache entries");
        removed
    }

    // == Contains Key ==
    /// Returns true if `key` holds a live value. Does not sweep.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    // == Length ==
    /// Returns the number of entries physically present, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for CacheStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("counters", &self.counters)
            .finish()
    }
}
