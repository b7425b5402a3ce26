// Disk models

use serde::{Deserialize, Serialize};

use super::system::percent;

/// Usage of a single mounted filesystem, as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountUsage {
    pub mount: String,
    pub total: u64,
    pub available: u64,
}

/// Usage of the primary disk. All zero when no primary mount was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub mount: String,
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub usage_percent: f64,
}

impl From<&MountUsage> for DiskStats {
    fn from(m: &MountUsage) -> Self {
        let available = m.available.min(m.total);
        let used = m.total - available;
        Self {
            mount: m.mount.clone(),
            total: m.total,
            used,
            available,
            usage_percent: percent(used, m.total),
        }
    }
}
