//! Shared Cache Handle
//!
//! Thread-safe wrapper around [`CacheStore`]. One mutex guards every
//! operation; none of them block on I/O, so the lock is held only for the
//! duration of a map operation.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;

// == Shared Cache ==
/// Cloneable handle to a single store. Clones see the same entries.
///
/// Concurrent writers to the same key race; the last `set` wins.
pub struct SharedCache<V> {
    inner: Arc<Mutex<CacheStore<V>>>,
    default_ttl: i64,
}

impl<V: Clone> SharedCache<V> {
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_store(CacheStore::with_clock(clock))
    }

    /// Creates an empty cache on the system clock using the configured
    /// default TTL.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty cache on the given clock using the configured
    /// default TTL.
    pub fn from_config_with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_clock(clock).with_default_ttl(config.default_ttl)
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            default_ttl: CacheConfig::default().default_ttl,
        }
    }

    /// Overrides the TTL used by [`set_default`](Self::set_default).
    pub fn with_default_ttl(mut self, ttl_secs: i64) -> Self {
        self.default_ttl = ttl_secs;
        self
    }

    /// See [`CacheStore::get`].
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().get(key)
    }

    /// See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl_secs: i64) {
        self.inner.lock().set(key, value, ttl_secs);
    }

    /// Stores a value with the handle's default TTL.
    pub fn set_default(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl);
    }

    /// See [`CacheStore::remove`].
    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// See [`CacheStore::invalidate_prefix`].
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.inner.lock().invalidate_prefix(prefix)
    }

    /// See [`CacheStore::clear`].
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// See [`CacheStore::stats`].
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// See [`CacheStore::reset_counters`].
    pub fn reset_counters(&self) {
        self.inner.lock().reset_counters();
    }

    /// See [`CacheStore::purge_expired`].
    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    /// See [`CacheStore::contains_key`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Number of entries physically present.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if no entries are present, stale ones included.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// TTL applied by [`set_default`](Self::set_default).
    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            default_ttl: self.default_ttl,
        }
    }
}

impl<V: Clone> Default for SharedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for SharedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::thread;

    #[test]
    fn test_clones_share_entries() {
        let cache: SharedCache<u32> = SharedCache::new();
        let other = cache.clone();

        cache.set("n", 7, 60);

        assert_eq!(other.get("n"), Some(7));
        other.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_default_uses_config_ttl() {
        let clock = ManualClock::default();
        let cache: SharedCache<&str> =
            SharedCache::with_clock(Arc::new(clock.clone())).with_default_ttl(10);

        cache.set_default("k", "v");
        clock.advance_secs(9);
        assert_eq!(cache.get("k"), Some("v"));

        clock.advance_secs(1);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_from_config() {
        let config = CacheConfig {
            default_ttl: 42,
            memo_ttl: 1,
        };
        let cache: SharedCache<u8> = SharedCache::from_config(&config);
        assert_eq!(cache.default_ttl(), 42);
    }

    #[test]
    fn test_from_config_with_clock() {
        let clock = ManualClock::default();
        let config = CacheConfig {
            default_ttl: 30,
            memo_ttl: 1,
        };
        let cache: SharedCache<u8> =
            SharedCache::from_config_with_clock(&config, Arc::new(clock.clone()));

        cache.set_default("k", 1);
        clock.advance_secs(29);
        assert_eq!(cache.get("k"), Some(1));

        clock.advance_secs(1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.default_ttl(), 30);
    }

    #[test]
    fn test_parallel_writers() {
        let cache: SharedCache<usize> = SharedCache::new();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(format!("t{}:{}", t, i), i, 60);
                        assert_eq!(cache.get(&format!("t{}:{}", t, i)), Some(i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 800);
        assert_eq!(cache.invalidate_prefix("t3:"), 100);
        assert_eq!(cache.stats().total, 700);
    }
}
