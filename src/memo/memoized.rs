//! Memoizing wrappers built on [`SharedCache`] get/set.

use std::marker::PhantomData;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::config::CacheConfig;
use crate::memo::{JsonKey, KeyStrategy};

/// Looks up `name`+`args`, running `compute` only on a miss.
///
/// The lock is not held while `compute` runs, so two callers missing the
/// same key at once both compute and the later `set` wins. Errors from
/// `compute` are returned as-is and nothing is stored. If no key can be
/// derived the computation runs uncached.
fn memoize<A, V, E, K>(
    cache: &SharedCache<V>,
    strategy: &K,
    name: &str,
    args: &A,
    ttl_secs: i64,
    compute: impl FnOnce() -> Result<V, E>,
) -> Result<V, E>
where
    A: ?Sized,
    V: Clone,
    K: KeyStrategy<A>,
{
    let key = match strategy.derive(name, args) {
        Ok(key) => key,
        Err(err) => {
            warn!(name, error = %err, "Cannot derive memo key, computing uncached");
            return compute();
        }
    };

    if let Some(value) = cache.get(&key) {
        debug!(key = %key, "Memo hit");
        return Ok(value);
    }

    debug!(key = %key, "Memo miss");
    let value = compute()?;
    cache.set(key, value.clone(), ttl_secs);
    Ok(value)
}

// == Memoized ==
/// A computation bundled with its cache, name, TTL and key strategy.
///
/// ```
/// use memo_cache::{Memoized, SharedCache};
///
/// let cache = SharedCache::new();
/// let square = Memoized::new(cache, "square", 60, |n: &u64| Ok::<_, String>(n * n));
///
/// assert_eq!(square.call(&12), Ok(144));
/// assert_eq!(square.call(&12), Ok(144)); // served from cache
/// ```
pub struct Memoized<A: ?Sized, V, E, F, K = JsonKey> {
    cache: SharedCache<V>,
    name: String,
    ttl_secs: i64,
    compute: F,
    strategy: K,
    _marker: PhantomData<fn(&A) -> Result<V, E>>,
}

impl<A, V, E, F> Memoized<A, V, E, F, JsonKey>
where
    A: Serialize + ?Sized,
    V: Clone,
    F: Fn(&A) -> Result<V, E>,
{
    /// Wraps `compute` using JSON-encoded argument keys.
    ///
    /// `ttl_secs` follows the store convention: `<= 0` never expires.
    pub fn new(cache: SharedCache<V>, name: impl Into<String>, ttl_secs: i64, compute: F) -> Self {
        Self {
            cache,
            name: name.into(),
            ttl_secs,
            compute,
            strategy: JsonKey,
            _marker: PhantomData,
        }
    }
}

impl<A, V, E, F, K> Memoized<A, V, E, F, K>
where
    A: ?Sized,
    V: Clone,
    F: Fn(&A) -> Result<V, E>,
    K: KeyStrategy<A>,
{
    /// Swaps in a different key strategy.
    pub fn with_strategy<K2: KeyStrategy<A>>(self, strategy: K2) -> Memoized<A, V, E, F, K2> {
        Memoized {
            cache: self.cache,
            name: self.name,
            ttl_secs: self.ttl_secs,
            compute: self.compute,
            strategy,
            _marker: PhantomData,
        }
    }

    /// Returns the cached result for `args`, computing and storing it on a miss.
    pub fn call(&self, args: &A) -> Result<V, E> {
        memoize(
            &self.cache,
            &self.strategy,
            &self.name,
            args,
            self.ttl_secs,
            || (self.compute)(args),
        )
    }

    /// Drops every cached result of this computation.
    ///
    /// Relies on the strategy putting `"{name}:"` at the head of each key,
    /// as [`JsonKey`] does.
    pub fn invalidate(&self) -> usize {
        self.cache.invalidate_prefix(&format!("{}:", self.name))
    }

    /// Computation name, the head of every key this wrapper writes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// TTL applied to stored results.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

// == Memoizer ==
/// Cache-bound helper for call sites that memoize inline instead of
/// holding a [`Memoized`].
#[derive(Debug, Clone)]
pub struct Memoizer<V> {
    cache: SharedCache<V>,
    ttl_secs: i64,
}

impl<V: Clone> Memoizer<V> {
    /// Creates a helper storing results in `cache` for `ttl_secs`.
    pub fn new(cache: SharedCache<V>, ttl_secs: i64) -> Self {
        Self { cache, ttl_secs }
    }

    /// Uses `memo_ttl` from the configuration.
    pub fn from_config(cache: SharedCache<V>, config: &CacheConfig) -> Self {
        Self::new(cache, config.memo_ttl)
    }

    /// Returns the cached value for `name`+`args` or runs `compute`.
    pub fn get_or_compute<A, E>(
        &self,
        name: &str,
        args: &A,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E>
    where
        A: Serialize + ?Sized,
    {
        memoize(&self.cache, &JsonKey, name, args, self.ttl_secs, compute)
    }

    /// Builds a [`Memoized`] sharing this helper's cache and TTL.
    pub fn wrap<A, E, F>(&self, name: impl Into<String>, compute: F) -> Memoized<A, V, E, F>
    where
        A: Serialize + ?Sized,
        F: Fn(&A) -> Result<V, E>,
    {
        Memoized::new(self.cache.clone(), name, self.ttl_secs, compute)
    }

    /// The cache results are stored in.
    pub fn cache(&self) -> &SharedCache<V> {
        &self.cache
    }
}
