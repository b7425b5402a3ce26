// Snapshot assembly: one sample -> rates -> history -> immutable snapshot.
// Rate and history state sit behind a single lock that is only held while a finished sample is
// applied, so each tick's read-compute-write is atomic and slow samples never queue other ticks.

use crate::error::AssemblyError;
use crate::history::HistoryStore;
use crate::models::*;
use crate::rate_tracker::RateTracker;
use crate::sampler::MetricsSource;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::instrument;

/// History stream key: one per interface plus the all-interface total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamId {
    Total,
    Interface(String),
}

#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    pub history_capacity: usize,
    /// Snapshots younger than this are shared instead of sampling again. Zero disables sharing.
    pub coalesce_window: Duration,
}

/// Counters for the stats log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    pub assembled: u64,
    pub coalesced: u64,
    pub failed: u64,
}

struct AssemblerState {
    rates: RateTracker,
    history: HistoryStore<StreamId, RateSample>,
    last: Option<(Instant, Arc<Snapshot>)>,
}

pub struct SnapshotAssembler {
    source: Arc<dyn MetricsSource>,
    state: Mutex<AssemblerState>,
    coalesce_window: Duration,
    assembled: AtomicU64,
    coalesced: AtomicU64,
    failed: AtomicU64,
}

impl SnapshotAssembler {
    pub fn new(source: Arc<dyn MetricsSource>, config: AssemblerConfig) -> Self {
        Self {
            source,
            state: Mutex::new(AssemblerState {
                rates: RateTracker::new(),
                history: HistoryStore::new(config.history_capacity),
                last: None,
            }),
            coalesce_window: config.coalesce_window,
            assembled: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Samples once and folds the result into rate and history state.
    ///
    /// The OS query runs without holding the state lock, so a stalled sample never delays other
    /// callers. A sample that finishes after a newer one has already been applied is stale; the
    /// newer snapshot is returned in its place and state is left alone. Dropping the returned
    /// future before it completes leaves state untouched.
    #[instrument(skip(self), fields(operation = "assemble"))]
    pub async fn assemble(&self) -> Result<Arc<Snapshot>, AssemblyError> {
        {
            let state = self.state.lock().await;
            if let Some((at, snapshot)) = &state.last
                && at.elapsed() < self.coalesce_window
            {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                return Ok(snapshot.clone());
            }
        }

        let source = self.source.clone();
        let raw = match tokio::task::spawn_blocking(move || source.sample()).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                return Err(e.into());
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                return Err(e.into());
            }
        };

        let mut state = self.state.lock().await;
        if let Some((_, newer)) = &state.last
            && raw.timestamp < newer.timestamp
        {
            tracing::debug!(
                sampled_at = raw.timestamp,
                newest = newer.timestamp,
                "stale sample; reusing newer snapshot"
            );
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            return Ok(newer.clone());
        }
        let snapshot = Arc::new(state.apply(raw));
        state.last = Some((Instant::now(), snapshot.clone()));
        self.assembled.fetch_add(1, Ordering::Relaxed);
        Ok(snapshot)
    }

    pub fn system_info(&self) -> SystemInfo {
        self.source.system_info()
    }

    pub fn stats(&self) -> AssemblerStats {
        AssemblerStats {
            assembled: self.assembled.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl AssemblerState {
    fn apply(&mut self, raw: RawSample) -> Snapshot {
        let timestamp = raw.timestamp;
        let counters: BTreeMap<String, InterfaceCounters> = raw
            .network
            .iter()
            .map(|(name, reading)| (name.clone(), reading.counters))
            .collect();
        let rates = self.rates.compute_rates(&counters, timestamp);
        let total: RateSample = rates.values().copied().sum();

        self.history.retain(|id| match id {
            StreamId::Total => true,
            StreamId::Interface(name) => rates.contains_key(name),
        });
        for (name, rate) in &rates {
            self.history
                .push(&StreamId::Interface(name.clone()), timestamp, *rate);
        }
        self.history.push(&StreamId::Total, timestamp, total);

        let total_history = self.history.snapshot(&StreamId::Total);
        let history = NetworkHistory {
            timestamps: total_history.iter().map(|p| p.timestamp).collect(),
            total: total_history,
            interfaces: rates
                .keys()
                .map(|name| {
                    let points = self.history.snapshot(&StreamId::Interface(name.clone()));
                    (name.clone(), points)
                })
                .collect(),
        };

        let interfaces = raw
            .network
            .into_iter()
            .map(|(name, reading)| InterfaceStat {
                rate: rates.get(&name).copied().unwrap_or_default(),
                name,
                mac_address: reading.mac_address,
                is_up: reading.is_up,
                total_upload: reading.counters.tx_bytes,
                total_download: reading.counters.rx_bytes,
            })
            .collect();

        Snapshot {
            timestamp,
            cpu: raw.cpu,
            load: raw.load,
            memory: raw.memory,
            disk: raw.disk,
            network: NetworkStats {
                interfaces,
                total,
                history,
            },
            temperature: raw.temperature,
            uptime: UptimeStats::from_secs(raw.uptime_secs),
            system: raw.system,
        }
    }
}
