// Domain models: raw samples and the wire snapshot

mod network;
mod snapshot;
mod storage;
mod system;

pub use network::{
    HistoryPoint, InterfaceCounters, InterfaceReading, InterfaceStat, NetworkHistory,
    NetworkStats, RateSample,
};
pub use snapshot::{RawSample, Snapshot};
pub use storage::{DiskStats, MountUsage};
pub use system::{
    CpuStats, LoadStats, MemoryStats, SwapStats, SystemInfo, TemperatureStats, UptimeStats,
    format_uptime,
};
