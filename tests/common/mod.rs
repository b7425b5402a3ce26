// Shared test helpers: raw sample builders and scripted metrics sources

#![allow(dead_code)]

use resmon::assembler::{AssemblerConfig, SnapshotAssembler};
use resmon::error::SamplerError;
use resmon::models::*;
use resmon::sampler::{MetricsSource, now_ms};
use resmon::session::{SchedulerConfig, SessionScheduler};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn test_system_info() -> SystemInfo {
    SystemInfo {
        platform: "linux".into(),
        os_name: "Linux".into(),
        distro: "Test Linux 1.0".into(),
        hostname: "testhost".into(),
        ..SystemInfo::default()
    }
}

/// Minimal raw sample with the given (name, rx, tx) counters.
pub fn raw_sample(timestamp: u64, interfaces: &[(&str, u64, u64)]) -> RawSample {
    let network: BTreeMap<String, InterfaceReading> = interfaces
        .iter()
        .map(|(name, rx, tx)| {
            (
                name.to_string(),
                InterfaceReading {
                    counters: InterfaceCounters {
                        rx_bytes: *rx,
                        tx_bytes: *tx,
                    },
                    mac_address: "00:00:00:00:00:00".into(),
                    is_up: true,
                },
            )
        })
        .collect();
    RawSample {
        timestamp,
        cpu: CpuStats {
            usage_percent: 12.5,
            per_core: vec![10.0, 15.0],
            logical_cores: 2,
            physical_cores: 1,
            ..CpuStats::default()
        },
        load: LoadStats::default(),
        memory: MemoryStats::from_totals(1024, 512, 256, 0, 0),
        disk: DiskStats::default(),
        network,
        temperature: None,
        uptime_secs: 3_725,
        system: test_system_info(),
    }
}

/// Replays a fixed list of results; fails with `SourceUnavailable` once exhausted.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<RawSample, SamplerError>>>,
    calls: AtomicU64,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<RawSample, SamplerError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsSource for ScriptedSource {
    fn sample(&self) -> Result<RawSample, SamplerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SamplerError::unavailable("script", "exhausted")))
    }

    fn system_info(&self) -> SystemInfo {
        test_system_info()
    }
}

/// Stamps each sample with the current time; eth0 counters grow on every call.
#[derive(Default)]
pub struct TickingSource {
    calls: AtomicU64,
}

impl TickingSource {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsSource for TickingSource {
    fn sample(&self) -> Result<RawSample, SamplerError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(raw_sample(now_ms(), &[("eth0", n * 1000, n * 500)]))
    }

    fn system_info(&self) -> SystemInfo {
        test_system_info()
    }
}

/// Like `TickingSource`, but the first sample blocks for `delay` after it has been stamped.
pub struct StallingSource {
    delay: Duration,
    calls: AtomicU64,
}

impl StallingSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsSource for StallingSource {
    fn sample(&self) -> Result<RawSample, SamplerError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let timestamp = now_ms();
        if n == 1 {
            std::thread::sleep(self.delay);
        }
        Ok(raw_sample(timestamp, &[("eth0", n * 1000, n * 500)]))
    }

    fn system_info(&self) -> SystemInfo {
        test_system_info()
    }
}

pub fn assembler_with(source: Arc<dyn MetricsSource>, coalesce_ms: u64) -> Arc<SnapshotAssembler> {
    Arc::new(SnapshotAssembler::new(
        source,
        AssemblerConfig {
            history_capacity: 60,
            coalesce_window: Duration::from_millis(coalesce_ms),
        },
    ))
}

pub fn scheduler_with(
    source: Arc<dyn MetricsSource>,
    default_interval_ms: u64,
    min_interval_ms: u64,
) -> Arc<SessionScheduler> {
    Arc::new(SessionScheduler::new(
        assembler_with(source, 0),
        SchedulerConfig {
            default_interval_ms,
            min_interval_ms,
            outbound_capacity: 16,
        },
    ))
}
