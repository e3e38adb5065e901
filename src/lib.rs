//! Memo Cache - An in-process TTL key-value cache
//!
//! Provides lazy TTL expiration, prefix invalidation, cache warming and
//! memoization of expensive per-user computations.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod memo;
pub mod warmer;

pub use cache::{CacheStats, CacheStore, SharedCache, NO_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use invalidation::{invalidate_event, scoped_key, InvalidationEvent};
pub use memo::{JsonKey, KeyStrategy, Memoized, Memoizer};
pub use warmer::{CacheWarmer, WarmTarget};
