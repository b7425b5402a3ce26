// Background app-stats worker: periodically logs session and assembly counters until shutdown.

use crate::session::SessionScheduler;
use std::sync::Arc;
use tokio::time::{Duration, interval};

pub struct WorkerDeps {
    pub scheduler: Arc<SessionScheduler>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        scheduler,
        mut shutdown_rx,
    } = deps;
    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs.max(1));

    tokio::spawn(async move {
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; nothing worth logging yet.
        stats_log_tick.tick().await;

        loop {
            tokio::select! {
                _ = stats_log_tick.tick() => {
                    let stats = scheduler.assembler().stats();
                    tracing::info!(
                        sessions = scheduler.active_sessions(),
                        live_timers = scheduler.live_timers(),
                        pushes_total = scheduler.pushes_total(),
                        snapshots_assembled = stats.assembled,
                        snapshots_coalesced = stats.coalesced,
                        assembly_failures = stats.failed,
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Stats worker shutting down");
                    break;
                }
            }
        }
    })
}
