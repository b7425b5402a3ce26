// Network interface models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cumulative byte counters of one interface since it came up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Raw per-interface reading taken by the sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceReading {
    pub counters: InterfaceCounters,
    pub mac_address: String,
    pub is_up: bool,
}

/// Instantaneous throughput of one interface (or of all interfaces summed). Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSample {
    pub upload_bytes_per_sec: f64,
    pub download_bytes_per_sec: f64,
}

impl RateSample {
    pub const ZERO: RateSample = RateSample {
        upload_bytes_per_sec: 0.0,
        download_bytes_per_sec: 0.0,
    };
}

impl std::ops::Add for RateSample {
    type Output = RateSample;

    fn add(self, rhs: RateSample) -> RateSample {
        RateSample {
            upload_bytes_per_sec: self.upload_bytes_per_sec + rhs.upload_bytes_per_sec,
            download_bytes_per_sec: self.download_bytes_per_sec + rhs.download_bytes_per_sec,
        }
    }
}

impl std::iter::Sum for RateSample {
    fn sum<I: Iterator<Item = RateSample>>(iter: I) -> RateSample {
        iter.fold(RateSample::ZERO, |acc, r| acc + r)
    }
}

/// One entry of a history series; timestamp is ms since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint<T> {
    pub timestamp: u64,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStat {
    pub name: String,
    pub mac_address: String,
    pub is_up: bool,
    /// Current rate in bytes/sec (computed against the previous tick).
    pub rate: RateSample,
    pub total_upload: u64,
    pub total_download: u64,
}

/// Recent throughput per interface plus the all-interface total; each series holds at most
/// the configured history capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHistory {
    pub timestamps: Vec<u64>,
    pub total: Vec<HistoryPoint<RateSample>>,
    pub interfaces: BTreeMap<String, Vec<HistoryPoint<RateSample>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub interfaces: Vec<InterfaceStat>,
    pub total: RateSample,
    pub history: NetworkHistory,
}
