// Host metrics via sysinfo

pub mod disk;
mod linux;
pub mod temperature;

use crate::error::SamplerError;
use crate::models::*;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Instant;
use sysinfo::{Components, Disks, Networks, System};
use tracing::instrument;

use self::disk::Platform;
use self::temperature::SensorReading;

/// Produces one `RawSample` per call. Implementations may block on OS queries; callers run
/// them on the blocking pool.
pub trait MetricsSource: Send + Sync {
    fn sample(&self) -> Result<RawSample, SamplerError>;

    /// Static identity, read once.
    fn system_info(&self) -> SystemInfo;
}

/// Wall-clock time in ms since the Unix epoch (0 if the clock is before the epoch).
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

struct CpuCache {
    at: Instant,
    usage: f64,
    per_core: Vec<f64>,
}

pub struct SysinfoSampler {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
    components: Mutex<Components>,
    last_cpu: Mutex<Option<CpuCache>>,
    platform: Platform,
    info: SystemInfo,
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let info = read_system_info(&sys);
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            components: Mutex::new(Components::new_with_refreshed_list()),
            last_cpu: Mutex::new(None),
            platform: Platform::current(),
            info,
        }
    }

    fn read_cpu_and_memory(&self) -> Result<(CpuStats, MemoryStats), SamplerError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| SamplerError::unavailable("cpu", format!("sysinfo lock poisoned: {e}")))?;
        let mut cache = self
            .last_cpu
            .lock()
            .map_err(|e| SamplerError::unavailable("cpu", format!("cpu cache lock poisoned: {e}")))?;

        // Usage is only meaningful between refreshes at least MINIMUM_CPU_UPDATE_INTERVAL
        // apart; faster callers get the previous figures without blocking.
        let now = Instant::now();
        let stale = cache
            .as_ref()
            .is_none_or(|c| now.duration_since(c.at) >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        if stale {
            sys.refresh_cpu_all();
            *cache = Some(CpuCache {
                at: now,
                usage: (sys.global_cpu_usage() as f64).clamp(0.0, 100.0),
                per_core: sys
                    .cpus()
                    .iter()
                    .map(|c| (c.cpu_usage() as f64).clamp(0.0, 100.0))
                    .collect(),
            });
        }
        let (usage_percent, per_core) = cache
            .as_ref()
            .map(|c| (c.usage, c.per_core.clone()))
            .unwrap_or_default();

        let first = sys.cpus().first();
        let cpu = CpuStats {
            usage_percent,
            per_core,
            physical_cores: System::physical_core_count().unwrap_or(0) as u32,
            logical_cores: sys.cpus().len() as u32,
            speed_mhz: first.map(|c| c.frequency()).unwrap_or(0),
            brand: first.map(|c| c.brand().trim().to_string()).unwrap_or_default(),
            vendor: first.map(|c| c.vendor_id().to_string()).unwrap_or_default(),
        };

        sys.refresh_memory();
        let memory = MemoryStats::from_totals(
            sys.total_memory(),
            sys.available_memory(),
            sys.free_memory(),
            sys.total_swap(),
            sys.used_swap(),
        );
        Ok((cpu, memory))
    }

    fn read_network(&self) -> Result<BTreeMap<String, InterfaceReading>, SamplerError> {
        let mut networks = self.networks.lock().map_err(|e| {
            SamplerError::unavailable("network", format!("sysinfo networks lock poisoned: {e}"))
        })?;
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    InterfaceReading {
                        counters: InterfaceCounters {
                            rx_bytes: data.total_received(),
                            tx_bytes: data.total_transmitted(),
                        },
                        mac_address: data.mac_address().to_string(),
                        is_up: linux::read_operstate(name).unwrap_or(true),
                    },
                )
            })
            .collect())
    }

    fn read_disk(&self) -> DiskStats {
        let mut disks = match self.disks.lock() {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, operation = "read_disk", "sysinfo disks lock poisoned");
                return DiskStats::default();
            }
        };
        disks.refresh(false);
        let mounts: Vec<MountUsage> = disks
            .list()
            .iter()
            .map(|d| MountUsage {
                mount: d.mount_point().to_string_lossy().into_owned(),
                total: d.total_space(),
                available: d.available_space(),
            })
            .collect();
        disk::select_primary_disk(self.platform, &mounts)
    }

    fn read_temperature(&self) -> Option<TemperatureStats> {
        let mut components = match self.components.lock() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "read_temperature",
                    "sysinfo components lock poisoned"
                );
                return None;
            }
        };
        components.refresh(false);
        let sensors: Vec<SensorReading> = components
            .list()
            .iter()
            .map(|c| SensorReading {
                label: c.label().to_string(),
                current: c.temperature(),
                max: c.max(),
            })
            .collect();
        temperature::summarize(&sensors)
    }
}

impl MetricsSource for SysinfoSampler {
    #[instrument(skip(self), fields(source = "sysinfo", operation = "sample"))]
    fn sample(&self) -> Result<RawSample, SamplerError> {
        let network = self.read_network()?;
        // Stamp right after the counters are read; rates are computed against this time.
        let timestamp = now_ms();
        let (cpu, memory) = self.read_cpu_and_memory()?;
        let disk = self.read_disk();
        let temperature = self.read_temperature();
        let load = System::load_average();

        Ok(RawSample {
            timestamp,
            cpu,
            load: LoadStats {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            memory,
            disk,
            network,
            temperature,
            uptime_secs: System::uptime(),
            system: self.info.clone(),
        })
    }

    fn system_info(&self) -> SystemInfo {
        self.info.clone()
    }
}

fn read_system_info(sys: &System) -> SystemInfo {
    SystemInfo {
        platform: std::env::consts::OS.into(),
        os_name: System::name().unwrap_or_else(|| std::env::consts::OS.into()),
        distro: linux::read_distro()
            .or_else(System::long_os_version)
            .unwrap_or_default(),
        release: System::os_version().unwrap_or_default(),
        kernel: System::kernel_version().unwrap_or_default(),
        arch: std::env::consts::ARCH.into(),
        hostname: System::host_name().unwrap_or_default(),
        system_manufacturer: linux::read_sys_vendor().unwrap_or_default(),
        system_model: linux::read_product_name().unwrap_or_default(),
        processor_name: linux::read_cpu_model()
            .or_else(|| {
                sys.cpus()
                    .first()
                    .map(|c| c.brand().trim().to_string())
                    .filter(|s| !s.is_empty() && s != "cpu0")
            })
            .unwrap_or_else(|| "Unknown".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::linux::os_release_value;

    #[test]
    fn os_release_value_strips_quotes() {
        let content = "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 24.04 LTS\"\nID=ubuntu\n";
        assert_eq!(
            os_release_value(content, "PRETTY_NAME").as_deref(),
            Some("Ubuntu 24.04 LTS")
        );
        assert_eq!(os_release_value(content, "ID").as_deref(), Some("ubuntu"));
        assert_eq!(os_release_value(content, "VERSION_ID"), None);
    }
}
