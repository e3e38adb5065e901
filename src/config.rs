//! Configuration Module
//!
//! Handles loading cache defaults from environment variables.

use std::env;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL in seconds used by `set_default`, 0 = never expires
    pub default_ttl: i64,
    /// TTL in seconds for memoized results, 0 = never expires
    pub memo_ttl: i64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_MEMO_TTL` - Memoization TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: read_ttl("CACHE_DEFAULT_TTL", defaults.default_ttl),
            memo_ttl: read_ttl("CACHE_MEMO_TTL", defaults.memo_ttl),
        }
    }

    /// Rejects negative TTLs.
    ///
    /// The store itself treats a negative TTL as permanent, but a negative
    /// value in configuration is almost certainly a typo.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "default_ttl must not be negative, got {}",
                self.default_ttl
            )));
        }
        if self.memo_ttl < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "memo_ttl must not be negative, got {}",
                self.memo_ttl
            )));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            memo_ttl: 300,
        }
    }
}

fn read_ttl(var: &str, fallback: i64) -> i64 {
    match env::var(var) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using {}", var, raw, fallback);
            fallback
        }),
        Err(_) => fallback,
    }
}
