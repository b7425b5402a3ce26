// Raw sample and assembled snapshot

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    CpuStats, DiskStats, InterfaceReading, LoadStats, MemoryStats, NetworkStats, SystemInfo,
    TemperatureStats, UptimeStats,
};

/// Point-in-time host readings produced by one `MetricsSource::sample` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Wall-clock time of the reading, ms since the Unix epoch.
    pub timestamp: u64,
    pub cpu: CpuStats,
    pub load: LoadStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    pub network: BTreeMap<String, InterfaceReading>,
    /// Absent when the host exposes no temperature sensors.
    pub temperature: Option<TemperatureStats>,
    pub uptime_secs: u64,
    pub system: SystemInfo,
}

/// One fully assembled metrics document for a single tick (wire format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: u64,
    pub cpu: CpuStats,
    pub load: LoadStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    pub network: NetworkStats,
    pub temperature: Option<TemperatureStats>,
    pub uptime: UptimeStats,
    pub system: SystemInfo,
}
