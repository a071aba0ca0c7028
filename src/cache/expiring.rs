//! Expiring Cache Module
//!
//! Thread-safe cache handle combining a locked [`CacheStore`] with its
//! background reclamation task.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheEntry, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, sweep_expired, CleanupHandle};

// == Expiring Cache ==
/// Concurrent key/value cache with per-entry TTL.
///
/// Readers take a shared lock and writers an exclusive one, each for the
/// duration of a single operation. `rename` and `copy` run their checks and
/// their mutation under one exclusive lock, so two callers racing for the
/// same destination key cannot both succeed.
///
/// Share across threads by wrapping in an `Arc`. Dropping the cache stops
/// its reclamation task; call [`shutdown`](Self::shutdown) to also wait for
/// the task to exit.
///
/// # Example
/// ```ignore
/// let cache = ExpiringCache::new(Duration::from_secs(300), Duration::from_secs(1))?;
/// cache.set("session:42", "token".to_string(), Some(Duration::from_secs(60)));
/// assert_eq!(cache.get("session:42"), Some("token".to_string()));
/// cache.shutdown().await;
/// ```
#[derive(Debug)]
pub struct ExpiringCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    cleanup: Mutex<Option<CleanupHandle>>,
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and, for a non-zero `cleanup_interval`, starts its
    /// reclamation task.
    ///
    /// # Arguments
    /// * `default_expiration` - TTL for entries set without one, zero = never expire
    /// * `cleanup_interval` - Sweep period, zero = lazy expiry only
    ///
    /// # Errors
    /// `NoRuntime` when reclamation is requested outside a Tokio runtime.
    pub fn new(default_expiration: Duration, cleanup_interval: Duration) -> Result<Self> {
        let cache = Self::without_reclamation(default_expiration);
        if !cleanup_interval.is_zero() {
            cache.start_reclamation(cleanup_interval)?;
        }
        Ok(cache)
    }

    /// Creates a cache from a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.default_expiration, config.cleanup_interval)
    }

    /// Creates a cache that relies on lazy expiry alone. Needs no runtime.
    pub fn without_reclamation(default_expiration: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(default_expiration))),
            cleanup: Mutex::new(None),
        }
    }

    // == Reclamation Control ==
    /// Starts the reclamation task on a cache that has none running.
    ///
    /// # Errors
    /// - `ReclamationRunning` if a task is already active
    /// - `InvalidInterval` for a zero interval
    /// - `NoRuntime` outside a Tokio runtime
    pub fn start_reclamation(&self, interval: Duration) -> Result<()> {
        let mut cleanup = self.cleanup.lock();
        if cleanup.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(CacheError::ReclamationRunning);
        }
        *cleanup = Some(spawn_cleanup_task(self.store.clone(), interval)?);
        Ok(())
    }

    /// True while a reclamation task is attached and running.
    pub fn is_reclaiming(&self) -> bool {
        self.cleanup
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the reclamation task and waits for it to exit.
    ///
    /// Safe to call more than once. The cache stays usable afterwards with
    /// lazy expiry only.
    pub async fn shutdown(&self) {
        let handle = self.cleanup.lock().take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
    }

    /// Runs one sweep now, returning the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        sweep_expired(&self.store)
    }

    // == Writes ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// `ttl: None` uses the default expiration; `Some(Duration::ZERO)` never expires.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.store.write().set(key, value, ttl);
    }

    /// Removes an entry. Fails with `KeyNotFound` if the key is not
    /// physically present; an expired but unswept entry is still removed.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.store.write().delete(key)
    }

    /// Removes every entry.
    pub fn flush_all(&self) {
        let removed = self.store.write().flush_all();
        debug!(removed, "Flushed cache");
    }

    /// Moves the entry at `key` to `new_key`.
    ///
    /// Membership is raw, as for `delete`: an expired but unswept entry at
    /// `new_key` still collides, and one at `key` is moved as is.
    ///
    /// # Errors
    /// Checked in order: `SameKey`, `KeyCollision`, `KeyNotFound`.
    pub fn rename(&self, key: &str, new_key: &str) -> Result<()> {
        self.store.write().rename(key, new_key)?;
        debug!(key, new_key, "Renamed key");
        Ok(())
    }

    /// Duplicates the entry at `key` into `new_key`, leaving the source intact.
    ///
    /// # Errors
    /// Checked in order: `SameKey`, `KeyCollision`, `KeyNotFound`.
    pub fn copy(&self, key: &str, new_key: &str) -> Result<()> {
        self.store.write().copy(key, new_key)?;
        debug!(key, new_key, "Copied key");
        Ok(())
    }

    // == Reads ==
    /// Returns a copy of the value if a live entry exists.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.read().get(key)
    }

    /// Returns a copy of the full entry, metadata included, if it is live.
    pub fn get_item(&self, key: &str) -> Option<CacheEntry<V>> {
        self.store.read().get_item(key)
    }

    /// True if a live entry exists for the key.
    pub fn exists(&self, key: &str) -> bool {
        self.store.read().exists(key)
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.store.read().count()
    }

    /// Values of all live entries whose key matches a `%` pattern.
    ///
    /// - `text%` - key starts with `text`
    /// - `%text` - key ends with `text`
    /// - `%text%` - key contains `text`
    /// - `text` - key equals `text`
    ///
    /// Returns `None` when nothing matches.
    pub fn get_like_key(&self, pattern: &str) -> Option<Vec<V>> {
        self.store.read().get_like_key(pattern)
    }

    // == Raw Inspection ==
    /// True if the key is physically stored, ignoring expiry.
    pub fn contains_raw(&self, key: &str) -> bool {
        self.store.read().contains_raw(key)
    }

    /// Physical number of entries, including expired ones not yet swept.
    pub fn raw_len(&self) -> usize {
        self.store.read().len()
    }

    pub fn default_expiration(&self) -> Duration {
        self.store.read().default_ttl()
    }
}
