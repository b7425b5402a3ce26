// Converts cumulative interface byte counters into instantaneous rates.

use crate::models::{InterfaceCounters, RateSample};
use std::collections::{BTreeMap, HashMap};

/// Last counters seen for one interface and when they were read.
#[derive(Debug, Clone, Copy)]
struct InterfaceRateState {
    counters: InterfaceCounters,
    timestamp_ms: u64,
}

/// Per-interface baselines. Single writer: only the assembly path calls `compute_rates`.
#[derive(Debug, Default)]
pub struct RateTracker {
    baselines: HashMap<String, InterfaceRateState>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes one rate per interface in `current` and replaces every baseline with `current`.
    ///
    /// A first observation, or a timestamp that did not advance, yields a zero rate.
    /// Interfaces missing from `current` are forgotten, so a re-added interface starts over.
    pub fn compute_rates(
        &mut self,
        current: &BTreeMap<String, InterfaceCounters>,
        now_ms: u64,
    ) -> BTreeMap<String, RateSample> {
        let rates = current
            .iter()
            .map(|(name, counters)| {
                let rate = match self.baselines.get(name) {
                    Some(prev) if now_ms > prev.timestamp_ms => {
                        let elapsed_secs = (now_ms - prev.timestamp_ms) as f64 / 1000.0;
                        rate_between(name, &prev.counters, counters, elapsed_secs)
                    }
                    _ => RateSample::ZERO,
                };
                (name.clone(), rate)
            })
            .collect();

        self.baselines = current
            .iter()
            .map(|(name, counters)| {
                (
                    name.clone(),
                    InterfaceRateState {
                        counters: *counters,
                        timestamp_ms: now_ms,
                    },
                )
            })
            .collect();

        rates
    }

    /// Number of interfaces with a baseline.
    pub fn tracked(&self) -> usize {
        self.baselines.len()
    }
}

fn rate_between(
    name: &str,
    prev: &InterfaceCounters,
    cur: &InterfaceCounters,
    elapsed_secs: f64,
) -> RateSample {
    if cur.rx_bytes < prev.rx_bytes || cur.tx_bytes < prev.tx_bytes {
        tracing::debug!(
            interface = name,
            prev_rx = prev.rx_bytes,
            prev_tx = prev.tx_bytes,
            rx = cur.rx_bytes,
            tx = cur.tx_bytes,
            "interface counters went backwards; treating as reset"
        );
    }
    RateSample {
        upload_bytes_per_sec: per_sec(prev.tx_bytes, cur.tx_bytes, elapsed_secs),
        download_bytes_per_sec: per_sec(prev.rx_bytes, cur.rx_bytes, elapsed_secs),
    }
}

fn per_sec(prev: u64, cur: u64, elapsed_secs: f64) -> f64 {
    // saturating_sub floors regressions (reset or wraparound) at zero
    cur.saturating_sub(prev) as f64 / elapsed_secs
}
