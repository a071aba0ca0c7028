//! Cache Store Module
//!
//! Single-threaded cache engine: a HashMap of entries with deadline-based
//! expiry. Locking is layered on top by [`ExpiringCache`](super::ExpiringCache).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, KeyPattern, MatchMode};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Key to entry mapping with lazy, read-time expiry.
///
/// Expired entries stay in the map until a sweep or an overwrite removes
/// them, but every read path treats them as absent.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// TTL applied when a caller passes none, zero = never expire
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries stored without an explicit one
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - `None` uses the default TTL, `Some(Duration::ZERO)` never expires
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        self.entries
            .insert(key.into(), CacheEntry::new(value, Some(effective_ttl)));
    }

    /// Returns the live entry for a key, skipping expired ones.
    fn live(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    // == Get Item ==
    /// Retrieves a copy of the full entry if it exists and has not expired.
    pub fn get_item(&self, key: &str) -> Option<CacheEntry<V>>
    where
        V: Clone,
    {
        self.live(key).cloned()
    }

    // == Get ==
    /// Retrieves a copy of the value if it exists and has not expired.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.live(key).map(|entry| entry.value.clone())
    }

    // == Exists ==
    /// Returns true if a live entry exists for the key.
    pub fn exists(&self, key: &str) -> bool {
        self.live(key).is_some()
    }

    // == Count ==
    /// Number of live entries. Expired entries awaiting a sweep are excluded.
    pub fn count(&self) -> usize {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Deletion works on raw membership: an expired entry that has not yet
    /// been swept is still removed successfully.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        match self.entries.remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    // == Flush All ==
    /// Removes every entry, returning how many were held.
    pub fn flush_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Checks shared by rename and copy, in order: same key, collision,
    /// missing source. Both membership checks are raw, like `delete`: an
    /// expired entry that has not been swept still occupies its key.
    fn check_relocation(&self, key: &str, new_key: &str) -> Result<()> {
        if key == new_key {
            return Err(CacheError::SameKey(key.to_string()));
        }
        if self.contains_raw(new_key) {
            return Err(CacheError::KeyCollision(new_key.to_string()));
        }
        if !self.contains_raw(key) {
            return Err(CacheError::KeyNotFound(key.to_string()));
        }
        Ok(())
    }

    // == Rename ==
    /// Moves the entry at `key` to `new_key`, keeping its deadline.
    pub fn rename(&mut self, key: &str, new_key: &str) -> Result<()> {
        self.check_relocation(key, new_key)?;

        let entry = self
            .entries
            .remove(key)
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))?;
        self.entries.insert(new_key.to_string(), entry);
        Ok(())
    }

    // == Copy ==
    /// Duplicates the entry at `key` into `new_key`, keeping its deadline.
    pub fn copy(&mut self, key: &str, new_key: &str) -> Result<()>
    where
        V: Clone,
    {
        self.check_relocation(key, new_key)?;

        let entry = self
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))?;
        self.entries.insert(new_key.to_string(), entry);
        Ok(())
    }

    // == Get Like Key ==
    /// Returns the values of all live entries whose key matches a `%` pattern.
    ///
    /// Returns `None` when nothing matches. Result order is unspecified.
    pub fn get_like_key(&self, pattern: &str) -> Option<Vec<V>>
    where
        V: Clone,
    {
        if self.entries.is_empty() {
            return None;
        }

        let pattern = KeyPattern::parse(pattern);
        if pattern.mode() == MatchMode::Exact {
            return self.get(pattern.literal()).map(|value| vec![value]);
        }

        let now = Instant::now();
        let values: Vec<V> = self
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired_at(now) && pattern.matches(key))
            .map(|(_, entry)| entry.value.clone())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    // == Expired Keys ==
    /// Snapshot of keys whose deadline has passed as of `now`.
    pub fn expired_keys(&self, now: Instant) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Remove Expired ==
    /// Removes the given keys if they are still expired as of `now`.
    ///
    /// A key overwritten after the snapshot was taken holds a fresh entry
    /// and is left alone. Missing keys are skipped.
    pub fn remove_expired(&mut self, keys: &[String], now: Instant) -> usize {
        let mut removed = 0;
        for key in keys {
            let still_expired = self
                .entries
                .get(key)
                .is_some_and(|entry| entry.is_expired_at(now));
            if still_expired {
                self.entries.remove(key);
                removed += 1;
            }
        }
        removed
    }

    // == Raw Inspection ==
    /// True if the key is physically present, expired or not.
    pub fn contains_raw(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Physical number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
