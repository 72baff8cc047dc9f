//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries so that
//! entries written once and never read again do not pile up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::TtlCache;

// == Sweep Handle ==
/// Owns the running sweep task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops the task and waits until it has terminated.
    pub async fn stop(mut self) {
        self.handle.abort();
        // The join result only reports the cancellation.
        let _ = (&mut self.handle).await;
        info!("TTL sweep task stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that calls [`TtlCache::sweep`] every `interval_secs` seconds.
///
/// The first sweep runs one full interval after startup. An interval of zero
/// is raised to one second.
///
/// # Example
/// ```ignore
/// let cache: TtlCache<String> = TtlCache::new(10_000, 900, EvictionPolicy::EvictOldest);
/// let sweeper = spawn_sweep_task(cache.clone(), 120);
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweep_task<V>(cache: TtlCache<V>, interval_secs: u64) -> SweepHandle
where
    V: Clone + Send + 'static,
{
    let period = Duration::from_secs(interval_secs.max(1));

    let handle = tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "Starting TTL sweep task");

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = cache.sweep();
            if removed > 0 {
                info!(removed, "TTL sweep: removed expired entries");
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    });

    SweepHandle { handle }
}
