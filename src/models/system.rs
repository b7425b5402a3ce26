// CPU, memory, temperature, uptime and system identity models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub usage_percent: f64,
    pub per_core: Vec<f64>,
    pub physical_cores: u32,
    pub logical_cores: u32,
    /// Current frequency of the first core in MHz (0 when unknown).
    pub speed_mhz: u64,
    pub brand: String,
    pub vendor: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub usage_percent: f64,
    pub swap: SwapStats,
}

impl MemoryStats {
    /// Builds memory figures from raw byte counts; percentages are 0 when a total is 0.
    pub fn from_totals(
        total: u64,
        available: u64,
        free: u64,
        swap_total: u64,
        swap_used: u64,
    ) -> Self {
        let used = total.saturating_sub(available);
        let swap_used = swap_used.min(swap_total);
        Self {
            total,
            used,
            free,
            available,
            usage_percent: percent(used, total),
            swap: SwapStats {
                total: swap_total,
                used: swap_used,
                free: swap_total - swap_used,
                usage_percent: percent(swap_used, swap_total),
            },
        }
    }
}

/// Temperatures in degrees Celsius. Each reading is absent when the host has no such sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureStats {
    pub main: Option<f64>,
    pub max: Option<f64>,
    pub cores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeStats {
    pub seconds: u64,
    pub formatted: String,
}

impl UptimeStats {
    pub fn from_secs(seconds: u64) -> Self {
        Self {
            seconds,
            formatted: format_uptime(seconds),
        }
    }
}

/// Static system identity; read once at startup, also exposed via GET /api/info.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    /// Platform as reported by the build target, e.g. "linux", "macos", "windows".
    pub platform: String,
    pub os_name: String,
    /// Distribution pretty name (Linux) or long OS version elsewhere.
    pub distro: String,
    pub release: String,
    pub kernel: String,
    pub arch: String,
    pub hostname: String,
    pub system_manufacturer: String,
    pub system_model: String,
    pub processor_name: String,
}

/// Formats uptime as "1d 2h 3m", leaving out zero parts; "0m" below one minute.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    let parts: Vec<String> = [(days, 'd'), (hours, 'h'), (minutes, 'm')]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n}{unit}"))
        .collect();
    if parts.is_empty() {
        "0m".into()
    } else {
        parts.join(" ")
    }
}

pub(crate) fn percent(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
