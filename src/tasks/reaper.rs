//! Store Reaper Task
//!
//! Background task that periodically removes expired store entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::store::ExpiringStore;

/// Shortest sweep period; tokio intervals reject a zero period.
const MIN_REAP_INTERVAL: Duration = Duration::from_millis(1);

// == Reaper Handle ==
/// Owns a running reaper task and the token that stops it.
///
/// Dropping the handle cancels the task without waiting for it.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReaperHandle {
    /// Signals the reaper to stop and waits for its loop to exit.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Token observed by the reaper loop.
    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Spawns a background task that sweeps expired entries out of `store`.
///
/// The first sweep runs one `interval` after spawning. Each sweep takes the
/// write lock only for the duration of [`ExpiringStore::cleanup_expired`],
/// so foreground `get`/`set` calls interleave with it freely. The loop exits
/// when `shutdown` is cancelled.
///
/// An `interval` below one millisecond is raised to one millisecond.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(ExpiringStore::new()));
/// let reaper = spawn_reaper(store.clone(), Duration::from_secs(1), CancellationToken::new());
/// // Later:
/// reaper.stop().await;
/// ```
pub fn spawn_reaper<V>(
    store: Arc<RwLock<ExpiringStore<V>>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> ReaperHandle
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.max(MIN_REAP_INTERVAL);
    let token = shutdown.clone();

    let task = tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting store reaper");

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Store reaper: shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = store.write().await.cleanup_expired();

                    if removed > 0 {
                        info!(removed, "Store reaper: removed expired entries");
                    } else {
                        debug!("Store reaper: no expired entries found");
                    }
                }
            }
        }
    });

    ReaperHandle {
        shutdown,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn shared_store() -> Arc<RwLock<ExpiringStore<String>>> {
        Arc::new(RwLock::new(ExpiringStore::new()))
    }

    #[tokio::test]
    async fn test_reaper_removes_expired_entries() {
        let store = shared_store();

        store.write().await.set(
            "expire_soon",
            "value".to_string(),
            Some(TimeDelta::milliseconds(50)),
        );

        let reaper = spawn_reaper(
            store.clone(),
            Duration::from_millis(50),
            CancellationToken::new(),
        );

        tokio::time::sleep(Duration::from_millis(300)).await;

        // Removed by the sweep, not by a read
        assert!(!store.read().await.contains_key("expire_soon"));
        assert_eq!(store.read().await.stats().expirations, 1);

        reaper.stop().await;
    }

    #[tokio::test]
    async fn test_reaper_zero_interval_is_clamped() {
        let store = shared_store();
        store
            .write()
            .await
            .set("dead", "value".to_string(), Some(TimeDelta::seconds(-1)));

        let reaper = spawn_reaper(store.clone(), Duration::ZERO, CancellationToken::new());

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Task did not panic and has swept the entry
        assert!(reaper.is_running());
        assert!(!store.read().await.contains_key("dead"));

        reaper.stop().await;
    }

    #[tokio::test]
    async fn test_reaper_preserves_valid_entries() {
        let store = shared_store();

        {
            let mut guard = store.write().await;
            guard.set("long_lived", "value".to_string(), Some(TimeDelta::hours(1)));
            guard.set("forever", "value".to_string(), None);
        }

        let reaper = spawn_reaper(
            store.clone(),
            Duration::from_millis(20),
            CancellationToken::new(),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;

        {
            let mut guard = store.write().await;
            assert_eq!(guard.get("long_lived"), Some("value".to_string()));
            assert_eq!(guard.get("forever"), Some("value".to_string()));
        }

        reaper.stop().await;
    }

    #[tokio::test]
    async fn test_reaper_stops_on_cancel() {
        let token = CancellationToken::new();
        let reaper = spawn_reaper(shared_store(), Duration::from_secs(60), token.clone());
        assert!(reaper.is_running());

        token.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!reaper.is_running(), "Task should exit after cancellation");
    }

    #[tokio::test]
    async fn test_reaper_stop_waits_for_exit() {
        let reaper = spawn_reaper(
            shared_store(),
            Duration::from_secs(60),
            CancellationToken::new(),
        );
        let token = reaper.token();

        reaper.stop().await;
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_foreground_calls_interleave_with_reaper() {
        let store = shared_store();
        let reaper = spawn_reaper(
            store.clone(),
            Duration::from_millis(1),
            CancellationToken::new(),
        );

        for i in 0..200 {
            let key = format!("k{}", i);
            store.write().await.set(key.clone(), "v".to_string(), None);
            assert_eq!(store.write().await.get(&key), Some("v".to_string()));
            tokio::task::yield_now().await;
        }

        assert_eq!(store.read().await.len(), 200);
        reaper.stop().await;
    }
}
