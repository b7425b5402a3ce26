// Linux-specific helpers: /proc, /etc/os-release, DMI, interface link state.

/// First "model name" from /proc/cpuinfo. Preferred over sysinfo when it reports "cpu0" etc.
pub(super) fn read_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        content
            .lines()
            .find(|line| line.starts_with("model name"))
            .and_then(|line| line.split_once(':'))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty() && *v != "cpu0")
            .map(str::to_string)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Distribution name from /etc/os-release: PRETTY_NAME, falling back to NAME.
pub(super) fn read_distro() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/etc/os-release").ok()?;
        os_release_value(&content, "PRETTY_NAME").or_else(|| os_release_value(&content, "NAME"))
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Looks up `key` in os-release formatted text, with surrounding quotes removed.
pub(super) fn os_release_value(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// System vendor from DMI.
pub(super) fn read_sys_vendor() -> Option<String> {
    read_dmi("sys_vendor")
}

/// Product name from DMI.
pub(super) fn read_product_name() -> Option<String> {
    read_dmi("product_name")
}

fn read_dmi(_field: &str) -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let v = std::fs::read_to_string(format!("/sys/class/dmi/id/{_field}")).ok()?;
        let v = v.trim();
        if v.is_empty() {
            return None;
        }
        Some(v.to_string())
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Link state from /sys/class/net/<interface>/operstate. `None` when the kernel does not say
/// (non-Linux, or "unknown" as reported by many virtual interfaces).
pub(super) fn read_operstate(_interface_name: &str) -> Option<bool> {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/operstate", _interface_name);
        let state = std::fs::read_to_string(path).ok()?;
        match state.trim() {
            "up" => Some(true),
            "down" | "lowerlayerdown" | "notpresent" | "dormant" => Some(false),
            _ => None,
        }
    }
    #[cfg(not(target_os = "linux"))]
    None
}
