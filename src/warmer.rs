//! Cache warming
//!
//! Pre-populates per-user and global keys so the first read after a login or
//! a deploy is a hit. Each target carries its own TTL; a failing loader is
//! logged and skipped so one bad source does not stop the rest.

use std::fmt::Display;

use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::invalidation::scoped_key;

/// Per-user namespaces warmed by default, with their TTLs.
pub const DEFAULT_USER_TARGETS: &[(&str, i64)] =
    &[("trending", 3600), ("profile", 600), ("recent_posts", 300)];

/// Global keys warmed by default, with their TTLs.
pub const DEFAULT_GLOBAL_TARGETS: &[(&str, i64)] =
    &[("platform:stats", 1800), ("hashtags:popular", 3600)];

// == Warm Target ==
/// One key family to pre-populate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmTarget {
    /// Namespace for user targets, full key for global ones
    pub name: String,
    /// TTL for the stored value
    pub ttl_secs: i64,
}

impl WarmTarget {
    pub fn new(name: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            name: name.into(),
            ttl_secs,
        }
    }
}

fn targets(defaults: &[(&str, i64)]) -> Vec<WarmTarget> {
    defaults
        .iter()
        .map(|&(name, ttl)| WarmTarget::new(name, ttl))
        .collect()
}

// == Cache Warmer ==
/// Fills a [`SharedCache`] from caller-supplied loaders.
///
/// ```
/// use memo_cache::{CacheWarmer, SharedCache};
///
/// let cache: SharedCache<String> = SharedCache::new();
/// let warmer = CacheWarmer::new(cache.clone());
///
/// let warmed = warmer.warm_user(7, |namespace, uid| {
///     Ok::<_, String>(format!("{namespace} for {uid}"))
/// });
///
/// assert_eq!(warmed, 3);
/// assert_eq!(cache.get("profile:7").as_deref(), Some("profile for 7"));
/// ```
#[derive(Debug, Clone)]
pub struct CacheWarmer<V> {
    cache: SharedCache<V>,
    user_targets: Vec<WarmTarget>,
    global_targets: Vec<WarmTarget>,
}

impl<V: Clone> CacheWarmer<V> {
    /// Creates a warmer with the default user and global targets.
    pub fn new(cache: SharedCache<V>) -> Self {
        Self {
            cache,
            user_targets: targets(DEFAULT_USER_TARGETS),
            global_targets: targets(DEFAULT_GLOBAL_TARGETS),
        }
    }

    /// Replaces the per-user targets.
    pub fn with_user_targets(mut self, user_targets: Vec<WarmTarget>) -> Self {
        self.user_targets = user_targets;
        self
    }

    /// Replaces the global targets.
    pub fn with_global_targets(mut self, global_targets: Vec<WarmTarget>) -> Self {
        self.global_targets = global_targets;
        self
    }

    pub fn user_targets(&self) -> &[WarmTarget] {
        &self.user_targets
    }

    pub fn global_targets(&self) -> &[WarmTarget] {
        &self.global_targets
    }

    // == Warm User ==
    /// Loads every user target for `user_id` and stores it under
    /// `"{namespace}:{user_id}"`.
    ///
    /// `load` receives the namespace and the user id. Failures are logged with
    /// `warn!` and skipped. Returns the number of keys written.
    pub fn warm_user<E, F>(&self, user_id: u64, load: F) -> usize
    where
        E: Display,
        F: Fn(&str, u64) -> Result<V, E>,
    {
        let mut warmed = 0;
        for target in &self.user_targets {
            match load(&target.name, user_id) {
                Ok(value) => {
                    self.cache
                        .set(scoped_key(&target.name, user_id), value, target.ttl_secs);
                    warmed += 1;
                }
                Err(err) => {
                    warn!(namespace = %target.name, user_id, error = %err, "Cache warm failed");
                }
            }
        }

        debug!(user_id, warmed, "Warmed user cache");
        warmed
    }

    // == Warm Global ==
    /// Loads every global target and stores it under its own key.
    ///
    /// Failures are logged and skipped. Returns the number of keys written.
    pub fn warm_global<E, F>(&self, load: F) -> usize
    where
        E: Display,
        F: Fn(&str) -> Result<V, E>,
    {
        let mut warmed = 0;
        for target in &self.global_targets {
            match load(&target.name) {
                Ok(value) => {
                    self.cache
                        .set(target.name.as_str(), value, target.ttl_secs);
                    warmed += 1;
                }
                Err(err) => {
                    warn!(key = %target.name, error = %err, "Cache warm failed");
                }
            }
        }

        debug!(warmed, "Warmed global cache");
        warmed
    }
}
