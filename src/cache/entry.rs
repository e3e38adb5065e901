//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

/// TTL value meaning "never expires".
pub const NO_TTL: i64 = 0;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiry, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry written at `now`.
    ///
    /// `ttl_secs <= 0` yields a permanent entry. Negative values are caller
    /// mistakes but are absorbed rather than rejected, as is a TTL too large
    /// to represent.
    pub fn new(value: V, ttl_secs: i64, now: DateTime<Utc>) -> Self {
        let expires_at = if ttl_secs > NO_TTL {
            Duration::try_seconds(ttl_secs).and_then(|ttl| now.checked_add_signed(ttl))
        } else {
            None
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so
    /// a 5 second entry is gone exactly 5 seconds after it was written.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::zero())` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry has no TTL
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|expires| (expires - now).max(Duration::zero()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", NO_TTL, t0());

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(t0() + Duration::days(3650)));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", 60, t0());

        assert_eq!(entry.expires_at, Some(t0() + Duration::seconds(60)));
        assert!(!entry.is_expired_at(t0()));
        assert!(!entry.is_expired_at(t0() + Duration::seconds(59)));
    }

    #[test]
    fn test_negative_ttl_is_permanent() {
        let entry = CacheEntry::new(1u32, -30, t0());
        assert!(entry.expires_at.is_none());
        assert!(entry.ttl_remaining(t0()).is_none());
    }

    #[test]
    fn test_huge_ttl_does_not_panic() {
        let entry = CacheEntry::new(1u32, i64::MAX, t0());
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", 5, t0());

        assert!(!entry.is_expired_at(t0() + Duration::milliseconds(4_999)));
        assert!(entry.is_expired_at(t0() + Duration::seconds(5)));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("test_value", 10, t0());

        assert_eq!(
            entry.ttl_remaining(t0() + Duration::seconds(4)),
            Some(Duration::seconds(6))
        );
        assert_eq!(
            entry.ttl_remaining(t0() + Duration::seconds(11)),
            Some(Duration::zero())
        );
    }
}
