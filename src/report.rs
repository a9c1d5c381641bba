// One-shot output modes: LibreNMS docker-app JSON and a connectivity check.
//
// Both share the row builder and rate estimator with agent mode but bypass
// the cache and protocol entirely: one fetch, one print, exit. Here a fetch
// failure is fatal.

use crate::cadvisor_repo::{ContainerSource, build_rows};
use crate::models::{ContainerState, MetricRow};
use chrono::Utc;
use serde::Serialize;

/// One element of the JSON array emitted by `--mode json`, shaped for the
/// LibreNMS Docker application.
#[derive(Debug, Serialize)]
pub struct ContainerReport {
    pub container: String,
    pub cpu: f64,
    pub pids: u64,
    pub memory: MemoryReport,
    pub state: StateReport,
    pub size: SizeReport,
}

#[derive(Debug, Serialize)]
pub struct MemoryReport {
    pub perc: f64,
    pub used: String,
    pub limit: String,
}

#[derive(Debug, Serialize)]
pub struct StateReport {
    pub status: &'static str,
    pub uptime: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SizeReport {
    pub size_rw: Option<u64>,
    pub size_root_fs: Option<u64>,
}

impl ContainerReport {
    pub fn from_row(row: &MetricRow) -> Self {
        // A limit of 0 or an absurd sentinel (>= 2^63, "unlimited" on some
        // kernels) means no usable limit.
        let limit = Some(row.memory_limit_bytes)
            .filter(|&l| l > 0 && l < (1u64 << 63));
        let perc = limit
            .map(|l| round2(row.memory_used_bytes as f64 / l as f64 * 100.0))
            .unwrap_or(0.0);
        Self {
            container: row.name.clone(),
            cpu: row.cpu_percent,
            pids: row.process_count,
            memory: MemoryReport {
                perc,
                used: format_bytes(row.memory_used_bytes),
                limit: format_bytes(limit.unwrap_or(0)),
            },
            state: StateReport {
                status: row.state.docker_status(),
                uptime: row.uptime_secs,
            },
            size: SizeReport {
                size_rw: row.size_rw_bytes,
                size_root_fs: row.size_root_fs_bytes,
            },
        }
    }
}

/// Human-readable binary units, two decimals above plain bytes.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    if bytes == 0 {
        "0B".to_string()
    } else if bytes >= GIB {
        format!("{:.2}GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2}MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2}KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes}B")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fetch once and print the snapshot as one JSON array on stdout.
pub async fn run_json<S: ContainerSource>(source: &S) -> anyhow::Result<()> {
    let data = source.fetch().await?;
    let rows = build_rows(&data, Utc::now());
    let reports: Vec<ContainerReport> = rows.iter().map(ContainerReport::from_row).collect();
    println!("{}", serde_json::to_string(&reports)?);
    Ok(())
}

/// Fetch once and print a human-readable summary; exits non-zero (via the
/// propagated error) when the daemon is unreachable.
pub async fn run_check<S: ContainerSource>(source: &S, url: &str) -> anyhow::Result<()> {
    let data = source.fetch().await?;
    let rows = build_rows(&data, Utc::now());
    eprintln!("connected to cAdvisor at {url}; {} containers", rows.len());
    for row in &rows {
        println!("{} (index {})", row.name, row.index);
        println!(
            "  state={} cpu={:.2}% pids={} restarts={}",
            match row.state {
                ContainerState::Running => "running",
                ContainerState::Stopped => "stopped",
            },
            row.cpu_percent,
            row.process_count,
            row.restart_count,
        );
        println!(
            "  memory {} / {}",
            format_bytes(row.memory_used_bytes),
            format_bytes(row.memory_limit_bytes),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_binary_units() {
        assert_eq!(format_bytes(0), "0B");
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(1536), "1.50KiB");
        assert_eq!(format_bytes(1_572_864), "1.50MiB");
        assert_eq!(format_bytes(2_147_483_648), "2.00GiB");
    }

    fn row(used: u64, limit: u64, state: ContainerState) -> MetricRow {
        MetricRow {
            index: 7,
            name: "web".to_string(),
            state,
            cpu_percent: 12.34,
            memory_used_bytes: used,
            memory_limit_bytes: limit,
            process_count: 5,
            restart_count: 2,
            uptime_secs: Some(60),
            size_rw_bytes: None,
            size_root_fs_bytes: Some(1024),
        }
    }

    #[test]
    fn report_computes_memory_percentage() {
        let report = ContainerReport::from_row(&row(256, 1024, ContainerState::Running));
        assert_eq!(report.memory.perc, 25.0);
        assert_eq!(report.state.status, "running");
    }

    #[test]
    fn report_treats_missing_or_absurd_limit_as_none() {
        let no_limit = ContainerReport::from_row(&row(256, 0, ContainerState::Stopped));
        assert_eq!(no_limit.memory.perc, 0.0);
        assert_eq!(no_limit.memory.limit, "0B");
        assert_eq!(no_limit.state.status, "exited");

        let absurd = ContainerReport::from_row(&row(256, u64::MAX, ContainerState::Running));
        assert_eq!(absurd.memory.perc, 0.0);
        assert_eq!(absurd.memory.limit, "0B");
    }

    #[test]
    fn report_serializes_expected_shape() {
        let value =
            serde_json::to_value(ContainerReport::from_row(&row(256, 1024, ContainerState::Running)))
                .unwrap();
        assert_eq!(value["container"], "web");
        assert_eq!(value["cpu"], 12.34);
        assert_eq!(value["pids"], 5);
        assert_eq!(value["memory"]["used"], "256B");
        assert_eq!(value["state"]["uptime"], 60);
        assert_eq!(value["size"]["size_rw"], serde_json::Value::Null);
        assert_eq!(value["size"]["size_root_fs"], 1024);
    }
}
