//! Stats Reporting Task
//!
//! Background task that periodically logs cache statistics for every group.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::group::GroupRegistry;

/// Logs one stats line per registered group.
///
/// Returns the number of groups reported.
pub fn report_stats(registry: &GroupRegistry) -> usize {
    let groups = registry.groups();

    for group in &groups {
        let stats = group.stats();
        info!(
            group = %stats.name,
            entries = stats.cache.total_entries,
            used_bytes = stats.cache.used_bytes,
            max_bytes = stats.cache.max_bytes,
            hits = stats.cache.hits,
            misses = stats.cache.misses,
            evictions = stats.cache.evictions,
            loads = stats.loads,
            load_failures = stats.load_failures,
            "cache stats"
        );
    }

    groups.len()
}

/// Spawns a background task that periodically reports group statistics.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between reports.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(GroupRegistry::new());
/// let stats_handle = spawn_stats_task(registry.clone(), 60);
/// // Later, during shutdown:
/// stats_handle.abort();
/// ```
pub fn spawn_stats_task(registry: Arc<GroupRegistry>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting stats reporting task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let reported = report_stats(&registry);
            if reported == 0 {
                debug!("Stats report: no groups registered");
            }
        }
    })
}
