// Domain models: upstream cAdvisor JSON schema and the derived metric rows.

mod cadvisor;
mod row;

pub use cadvisor::{
    ContainerSample, ContainerSpec, CpuSpec, CpuStats, CpuUsage, FilesystemSpec, FilesystemStats,
    MemorySpec, MemoryStats, ProcessStats, StatSample,
};
pub use row::{ContainerState, MetricRow, Snapshot};
