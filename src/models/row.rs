// Normalized per-container metric rows.

use serde::Serialize;

/// Container state derived from stat recency; serializes to lowercase JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Stopped,
}

impl ContainerState {
    /// SNMP state code: 1=running, 2=stopped.
    pub fn code(self) -> i64 {
        match self {
            ContainerState::Running => 1,
            ContainerState::Stopped => 2,
        }
    }

    /// Docker-style status string for the one-shot report.
    pub fn docker_status(self) -> &'static str {
        match self {
            ContainerState::Running => "running",
            ContainerState::Stopped => "exited",
        }
    }
}

/// One container's metrics within a single snapshot. Rebuilt from scratch on
/// every cache refresh; never outlives its snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRow {
    /// Hash-derived table index, unique within the snapshot.
    pub index: u32,
    pub name: String,
    pub state: ContainerState,
    /// Clamped to [0, 100] per logical core, two decimals.
    pub cpu_percent: f64,
    pub memory_used_bytes: u64,
    /// 0 means no limit observed.
    pub memory_limit_bytes: u64,
    pub process_count: u64,
    pub restart_count: u32,
    pub uptime_secs: Option<u64>,
    pub size_rw_bytes: Option<u64>,
    pub size_root_fs_bytes: Option<u64>,
}

/// One consistent, fully built row set as of one refresh, sorted by `index`.
pub type Snapshot = Vec<MetricRow>;
