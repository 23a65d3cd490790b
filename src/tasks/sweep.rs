//! Expiry Sweep Task
//!
//! Background task that periodically drops stale entries from an expiry map.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::map::Shared;

// == Sweep Handle ==
/// Owner side of a running sweep task.
///
/// Dropping the handle closes the shutdown channel, which also ends the task.
#[derive(Debug)]
pub(crate) struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
    /// Flips to true when the task returns normally; closed once it is gone
    exited_rx: watch::Receiver<bool>,
}

impl SweepHandle {
    /// Returns true while the task is alive and has not been asked to stop.
    pub(crate) fn is_running(&self) -> bool {
        !*self.shutdown_tx.borrow() && self.exited_rx.has_changed().is_ok()
    }

    /// Signals the task to stop and waits until it has exited.
    ///
    /// Every caller waits for the same exit, so concurrent calls all return
    /// only once the task is gone.
    pub(crate) async fn shutdown(&self) {
        if self.shutdown_tx.send_replace(true) {
            debug!("Expiry sweep task already signalled to stop");
        }

        let mut exited = self.exited_rx.clone();
        while exited.changed().await.is_ok() {}

        if !*exited.borrow() {
            warn!("Expiry sweep task ended abnormally");
        }
    }

    #[cfg(test)]
    pub(crate) fn exited_cleanly(&self) -> bool {
        *self.exited_rx.borrow()
    }
}

/// Spawns the task that sweeps `shared` every `sweep_interval`.
///
/// The first sweep happens one full interval after the task starts. Missed
/// ticks are skipped, not replayed. A stop signal wins over a pending tick, so
/// no final sweep runs on shutdown. An interval too large for the clock never
/// ticks; such a map is only swept through `purge_expired`.
///
/// # Arguments
/// * `runtime` - Runtime to spawn on
/// * `shared` - State shared with the owning map
/// * `sweep_interval` - Period between sweeps, non-zero
pub(crate) fn spawn_sweep_task<K, V>(
    runtime: &Handle,
    shared: Arc<Shared<K, V>>,
    sweep_interval: Duration,
) -> SweepHandle
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let (exited_tx, exited_rx) = watch::channel(false);

    runtime.spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {:?}",
            sweep_interval
        );

        let mut ticker = Instant::now()
            .checked_add(sweep_interval)
            .map(|start| {
                let mut ticker = interval_at(start, sweep_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                ticker
            });
        if ticker.is_none() {
            info!(
                "Sweep interval {:?} is beyond the clock range, sweeping on demand only",
                sweep_interval
            );
        }

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = next_tick(&mut ticker) => {
                    let removed = shared.sweep();
                    if removed > 0 {
                        debug!("Expiry sweep: removed {} stale entries", removed);
                    } else {
                        trace!("Expiry sweep: no stale entries found");
                    }
                }
            }
        }

        info!("Expiry sweep task stopped");
        exited_tx.send_replace(true);
    });

    SweepHandle {
        shutdown_tx,
        exited_rx,
    }
}

/// Waits for the next tick, or forever when there is no ticker.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
