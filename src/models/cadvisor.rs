// cAdvisor /api/v1.3/docker response models.
//
// Every field is optional or defaulted: the API has grown fields over time
// and older daemons omit whole sections. Anything structurally wrong for a
// single container surfaces as a SampleError at conversion time instead of
// failing the whole document.

use serde::Deserialize;
use std::collections::HashMap;

/// One container's record in the `/api/v1.3/docker` mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerSample {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub aliases: Option<Vec<String>>,
    #[serde(default)]
    pub spec: ContainerSpec,
    #[serde(default)]
    pub stats: Vec<StatSample>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub cpu: CpuSpec,
    #[serde(default)]
    pub memory: MemorySpec,
    #[serde(default)]
    pub filesystem: Option<FilesystemSpec>,
}

/// CPU allocation. `limit` is in nanocores on current daemons but was a
/// whole-core count historically; the rate estimator disambiguates by
/// magnitude.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CpuSpec {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemorySpec {
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Writable-layer sizes, when the daemon reports them in the spec.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesystemSpec {
    #[serde(default, alias = "sizeRw")]
    pub size_rw: Option<u64>,
    #[serde(default, alias = "sizeRootFs")]
    pub size_root_fs: Option<u64>,
}

/// One periodic stat snapshot inside a container record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatSample {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub cpu: CpuStats,
    #[serde(default)]
    pub memory: MemoryStats,
    #[serde(default)]
    pub processes: ProcessStats,
    #[serde(default)]
    pub filesystem: Vec<FilesystemStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub usage: CpuUsage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CpuUsage {
    /// Cumulative CPU time in nanoseconds, all cores combined.
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub usage: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessStats {
    #[serde(default)]
    pub process_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesystemStats {
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub capacity: Option<u64>,
    #[serde(default)]
    pub usage: Option<u64>,
}
