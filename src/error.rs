//! Error types for the cache
//!
//! Store operations never fail; these errors only surface from key
//! derivation and configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Memoization arguments could not be encoded into a key
    #[error("Key derivation failed: {0}")]
    KeyDerivation(#[from] serde_json::Error),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
