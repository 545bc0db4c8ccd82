//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired items out of the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::metrics::Metrics;
use crate::store::SharedStore;

/// Spawns the background task that periodically sweeps expired items.
///
/// The first sweep runs one full interval after the call. Each sweep's
/// reclaim count is logged as `deleted_items` and recorded on `metrics`.
///
/// The task stops when `shutdown` becomes `true` or its sender is dropped.
/// Cancellation is checked before every tick, so a stop request that races
/// a due tick wins; a sweep already running is allowed to finish.
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_cleanup_task(store, metrics, Duration::from_secs(30), shutdown_rx);
/// // Later, during shutdown:
/// shutdown_tx.send(true).ok();
/// handle.await.ok();
/// ```
pub fn spawn_cleanup_task(
    store: SharedStore,
    metrics: Arc<Metrics>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            "Starting TTL cleanup task"
        );

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = store.sweep_expired().await;
                    metrics.record_sweep(removed);
                    info!(deleted_items = removed, "cleanup run");
                }
            }
        }

        info!("cleanup worker stopped");
    })
}
