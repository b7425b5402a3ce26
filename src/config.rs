use serde::Deserialize;
use std::time::Duration;

use crate::assembler::AssemblerConfig;
use crate::session::SchedulerConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    /// Interval a new session starts with.
    #[serde(default = "default_interval_ms")]
    pub default_interval_ms: u64,
    /// Smallest interval a viewer may request; smaller requests are ignored.
    #[serde(default = "default_interval_ms")]
    pub min_interval_ms: u64,
    /// Points kept per network history series.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Sessions ticking within this window share one snapshot (0 = always sample).
    #[serde(default = "default_coalesce_window_ms")]
    pub coalesce_window_ms: u64,
    /// Snapshots buffered per viewer before its timer waits (slow clients).
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_history_capacity() -> usize {
    crate::history::DEFAULT_CAPACITY
}

fn default_coalesce_window_ms() -> u64 {
    200
}

fn default_outbound_capacity() -> usize {
    16
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: default_interval_ms(),
            min_interval_ms: default_interval_ms(),
            history_capacity: default_history_capacity(),
            coalesce_window_ms: default_coalesce_window_ms(),
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

impl SamplingConfig {
    pub fn assembler(&self) -> AssemblerConfig {
        AssemblerConfig {
            history_capacity: self.history_capacity,
            coalesce_window: Duration::from_millis(self.coalesce_window_ms),
        }
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            default_interval_ms: self.default_interval_ms,
            min_interval_ms: self.min_interval_ms,
            outbound_capacity: self.outbound_capacity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (sessions, snapshots assembled/failed) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.sampling.min_interval_ms > 0,
            "sampling.min_interval_ms must be > 0, got {}",
            self.sampling.min_interval_ms
        );
        anyhow::ensure!(
            self.sampling.default_interval_ms >= self.sampling.min_interval_ms,
            "sampling.default_interval_ms must be >= sampling.min_interval_ms ({}), got {}",
            self.sampling.min_interval_ms,
            self.sampling.default_interval_ms
        );
        anyhow::ensure!(
            self.sampling.history_capacity > 0,
            "sampling.history_capacity must be > 0, got {}",
            self.sampling.history_capacity
        );
        anyhow::ensure!(
            self.sampling.coalesce_window_ms < self.sampling.min_interval_ms,
            "sampling.coalesce_window_ms must be < sampling.min_interval_ms ({}), got {}",
            self.sampling.min_interval_ms,
            self.sampling.coalesce_window_ms
        );
        anyhow::ensure!(
            self.sampling.outbound_capacity > 0,
            "sampling.outbound_capacity must be > 0, got {}",
            self.sampling.outbound_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
