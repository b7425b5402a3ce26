// Primary disk selection by platform convention.

use crate::models::{DiskStats, MountUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Other,
        }
    }

    /// Mount points tried in order.
    fn primary_mounts(self) -> &'static [&'static str] {
        match self {
            Platform::Windows => &["C:\\", "C:"],
            Platform::MacOs => &["/System/Volumes/Data", "/"],
            Platform::Other => &["/"],
        }
    }
}

/// Usage of the platform's primary mount; zeroed when none of `mounts` matches.
pub fn select_primary_disk(platform: Platform, mounts: &[MountUsage]) -> DiskStats {
    platform
        .primary_mounts()
        .iter()
        .find_map(|want| mounts.iter().find(|m| m.mount == *want))
        .map(DiskStats::from)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mount(mount: &str, total: u64, available: u64) -> MountUsage {
        MountUsage {
            mount: mount.into(),
            total,
            available,
        }
    }

    #[test]
    fn linux_uses_root() {
        let mounts = [mount("/boot", 10, 5), mount("/", 1000, 250)];
        let disk = select_primary_disk(Platform::Other, &mounts);
        assert_eq!(disk.mount, "/");
        assert_eq!(disk.used, 750);
        assert_eq!(disk.available, 250);
        assert_eq!(disk.usage_percent, 75.0);
    }

    #[test]
    fn macos_prefers_data_volume() {
        let mounts = [mount("/", 500, 400), mount("/System/Volumes/Data", 1000, 100)];
        let disk = select_primary_disk(Platform::MacOs, &mounts);
        assert_eq!(disk.mount, "/System/Volumes/Data");
        assert_eq!(disk.total, 1000);
    }

    #[test]
    fn macos_falls_back_to_root() {
        let mounts = [mount("/Volumes/usb", 8, 8), mount("/", 500, 400)];
        assert_eq!(select_primary_disk(Platform::MacOs, &mounts).mount, "/");
    }

    #[test]
    fn windows_accepts_either_c_form() {
        let with_slash = [mount("D:\\", 1, 1), mount("C:\\", 200, 50)];
        assert_eq!(select_primary_disk(Platform::Windows, &with_slash).total, 200);
        let bare = [mount("C:", 300, 100)];
        assert_eq!(select_primary_disk(Platform::Windows, &bare).used, 200);
    }

    #[test]
    fn no_match_is_zeroed() {
        let disk = select_primary_disk(Platform::Other, &[mount("/home", 10, 1)]);
        assert_eq!(disk, DiskStats::default());
        assert_eq!(disk.usage_percent, 0.0);
    }

    #[test]
    fn zero_sized_mount_has_zero_percent() {
        let disk = select_primary_disk(Platform::Other, &[mount("/", 0, 0)]);
        assert_eq!(disk.usage_percent, 0.0);
    }
}
