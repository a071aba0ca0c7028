//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Handle to a running cleanup task.
///
/// Dropping the handle signals the task to stop without waiting for it.
/// Use [`CleanupHandle::shutdown`] to stop it and wait for exit.
#[derive(Debug)]
pub struct CleanupHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl CleanupHandle {
    /// Signals the task to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signals the task to stop and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("TTL cleanup task ended abnormally: {}", err);
            }
        }
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs one sweep: snapshot expired keys under the read lock, then remove
/// them under the write lock.
///
/// Returns the number of entries removed.
pub fn sweep_expired<V>(cache: &RwLock<CacheStore<V>>) -> usize {
    let expired = cache.read().expired_keys(Instant::now());
    if expired.is_empty() {
        return 0;
    }
    cache.write().remove_expired(&expired, Instant::now())
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task sleeps for `interval` between sweeps and exits as soon as the
/// returned handle signals shutdown or is dropped.
///
/// # Errors
/// - `InvalidInterval` if `interval` is zero
/// - `NoRuntime` if called outside a Tokio runtime
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::<String>::new(Duration::ZERO)));
/// let cleanup = spawn_cleanup_task(cache.clone(), Duration::from_secs(1))?;
/// // Later, during shutdown:
/// cleanup.shutdown().await;
/// ```
pub fn spawn_cleanup_task<V>(
    cache: Arc<RwLock<CacheStore<V>>>,
    interval: Duration,
) -> Result<CleanupHandle>
where
    V: Send + Sync + 'static,
{
    if interval.is_zero() {
        return Err(CacheError::InvalidInterval);
    }
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = runtime.spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {}ms",
            interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let removed = sweep_expired(&cache);

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }

        info!("TTL cleanup task stopped");
    });

    Ok(CleanupHandle {
        shutdown_tx,
        task: Some(task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(50);

    fn shared_store() -> Arc<RwLock<CacheStore<String>>> {
        Arc::new(RwLock::new(CacheStore::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = shared_store();
        cache
            .write()
            .set("expire_soon", "value".to_string(), Some(SHORT));

        let handle = spawn_cleanup_task(cache.clone(), SHORT).unwrap();

        tokio::time::sleep(SHORT * 4).await;

        assert!(
            !cache.read().contains_raw("expire_soon"),
            "Expired entry should have been physically removed"
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = shared_store();
        cache
            .write()
            .set("long_lived", "value".to_string(), Some(Duration::from_secs(3600)));
        cache.write().set("forever", "value".to_string(), None);

        let handle = spawn_cleanup_task(cache.clone(), SHORT).unwrap();

        tokio::time::sleep(SHORT * 3).await;

        assert_eq!(cache.read().get("long_lived"), Some("value".to_string()));
        assert!(cache.read().contains_raw("forever"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_cleanup_task_shutdown_waits_for_exit() {
        let cache = shared_store();

        let handle = spawn_cleanup_task(cache, Duration::from_secs(3600)).unwrap();
        assert!(!handle.is_finished());

        // Must not wait out the hour-long sleep
        tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
            .await
            .expect("shutdown should interrupt the sleep");
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_on_drop() {
        let cache = shared_store();

        drop(spawn_cleanup_task(cache.clone(), SHORT).unwrap());

        cache.write().set("key", "value".to_string(), Some(Duration::from_millis(10)));
        tokio::time::sleep(SHORT * 3).await;

        // No sweep ran, so the expired entry is still physically present
        assert!(cache.read().contains_raw("key"));
        assert_eq!(cache.read().get("key"), None);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let result = spawn_cleanup_task(shared_store(), Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidInterval)));
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let result = spawn_cleanup_task(shared_store(), SHORT);
        assert!(matches!(result, Err(CacheError::NoRuntime)));
    }

    #[test]
    fn test_sweep_expired_counts_removed() {
        let cache = shared_store();
        cache.write().set("a", "1".to_string(), Some(Duration::from_millis(5)));
        cache.write().set("b", "2".to_string(), None);
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(sweep_expired(&cache), 1);
        assert_eq!(sweep_expired(&cache), 0);
        assert_eq!(cache.read().len(), 1);
    }
}
