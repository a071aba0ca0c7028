//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// The cache hands out clones of entries, never references into its map.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, never inspected by the cache
    pub value: V,
    /// Wall-clock time the entry was inserted or last overwritten
    pub created_at: DateTime<Utc>,
    /// Deadline after which the entry is expired, None = no expiration
    pub expires_at: Option<Instant>,
    /// TTL originally requested, None = no expiration
    pub ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// A zero TTL is treated the same as `None`: the entry never expires.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        let ttl = ttl.filter(|ttl| !ttl.is_zero());
        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));

        Self {
            value,
            created_at: Utc::now(),
            expires_at,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is strictly past its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant, so a sweep can apply
    /// one consistent "now" to every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Time elapsed since the entry was written.
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.created_at)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(entry.ttl.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_never_expires() {
        let entry = CacheEntry::new(1u32, Some(Duration::ZERO));

        assert!(entry.expires_at.is_none());
        assert!(entry.ttl.is_none());
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(86_400)));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_secs(60)));

        assert!(entry.expires_at.is_some());
        assert_eq!(entry.ttl, Some(Duration::from_secs(60)));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_millis(20)));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(40));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_secs(10)));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new("test_value", None);
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_millis(5)));

        sleep(Duration::from_millis(20));

        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            created_at: Utc::now(),
            expires_at: Some(now),
            ttl: Some(Duration::from_millis(1)),
        };

        // Exactly at the deadline is still live; one tick later is not
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_age_is_non_negative() {
        let entry = CacheEntry::new((), None);
        assert!(entry.age() >= chrono::Duration::zero());
    }
}
