//! Maintenance Sweep Task
//!
//! Background task that periodically removes expired entries from the hot
//! cache and prunes expired rows from the durable mirror. Lazy eviction
//! already keeps expired entries from being served; the sweep just reclaims
//! their slots and bounds mirror growth across long uptimes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::GeocodeCache;

/// Spawns a background task that periodically sweeps the cache.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps.
///
/// # Arguments
/// * `cache` - Shared cache instance
/// * `interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<GeocodeCache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting maintenance sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let swept = cache.sweep_expired();
            let pruned = cache.prune_store().await;

            if swept > 0 || pruned > 0 {
                info!(swept, pruned, "maintenance sweep removed expired entries");
            } else {
                debug!("maintenance sweep found nothing expired");
            }
        }
    })
}
