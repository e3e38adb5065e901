//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration and prefix invalidation.

mod entry;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, NO_TTL};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;
