// Convert raw cAdvisor container records into normalized metric rows.

use crate::errors::SampleError;
use crate::models::{ContainerSample, ContainerState, MetricRow, Snapshot};
use chrono::{DateTime, NaiveDateTime, Utc};
use sha1::{Digest, Sha1};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use super::cpu;

/// Stats older than this mean the container is no longer running; cAdvisor
/// only samples live containers.
const FRESHNESS_SECS: i64 = 300;

/// Orchestrator-assigned container name label.
const K8S_NAME_LABEL: &str = "io.kubernetes.container.name";
/// Compose bumps this label on every restart of a service container.
const COMPOSE_RESTART_LABEL: &str = "com.docker.compose.container-number";

/// Build the full snapshot from the raw upstream document. Containers are
/// processed in id order; a malformed record is logged and skipped without
/// blocking the rest. The result is sorted by final index.
pub fn build_rows(data: &HashMap<String, serde_json::Value>, now: DateTime<Utc>) -> Snapshot {
    let mut ids: Vec<&String> = data.keys().collect();
    ids.sort();

    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        match build_row(id, &data[id], now) {
            Ok(row) => rows.push(row),
            Err(e) => warn!(error = %e, "skipping container"),
        }
    }
    assign_indices(&mut rows);
    rows.sort_by_key(|r| r.index);
    rows
}

/// Convert one container record. Exposed for unit tests.
pub fn build_row(
    id: &str,
    raw: &serde_json::Value,
    now: DateTime<Utc>,
) -> Result<MetricRow, SampleError> {
    let sample: ContainerSample = serde_json::from_value(raw.clone())
        .map_err(|e| SampleError::new(id, e.to_string()))?;

    let name = resolve_name(id, &sample);
    let (size_rw_bytes, size_root_fs_bytes) = resolve_fs_sizes(&sample);
    let last_stat = sample.stats.last();

    Ok(MetricRow {
        index: stable_seed(&name),
        state: resolve_state(&sample, now),
        cpu_percent: cpu::cpu_percent(&sample),
        memory_used_bytes: last_stat.and_then(|s| s.memory.usage).unwrap_or(0),
        memory_limit_bytes: sample.spec.memory.limit.unwrap_or(0),
        process_count: last_stat.and_then(|s| s.processes.process_count).unwrap_or(0),
        restart_count: resolve_restart_count(&sample),
        uptime_secs: resolve_uptime(&sample, now),
        size_rw_bytes,
        size_root_fs_bytes,
        name,
    })
}

/// 16-bit seed from the SHA-1 of the name (first two bytes, big-endian);
/// zero maps to one so the index never collides with the table root.
pub fn stable_seed(name: &str) -> u32 {
    let digest = Sha1::digest(name.as_bytes());
    let seed = u16::from_be_bytes([digest[0], digest[1]]);
    if seed == 0 { 1 } else { u32::from(seed) }
}

/// Resolve per-snapshot index collisions by probing to the next free integer.
/// Iteration order (sorted container ids) keeps the outcome deterministic.
fn assign_indices(rows: &mut [MetricRow]) {
    let mut used = HashSet::with_capacity(rows.len());
    for row in rows.iter_mut() {
        let mut index = row.index;
        while !used.insert(index) {
            index += 1;
        }
        row.index = index;
    }
}

/// First non-empty alias (slash-stripped), else the orchestrator name label,
/// else the first 12 chars of the raw identifier sans leading slash.
fn resolve_name(id: &str, sample: &ContainerSample) -> String {
    if let Some(alias) = sample
        .aliases
        .iter()
        .flatten()
        .find(|a| !a.is_empty())
    {
        return alias.trim_start_matches('/').to_string();
    }
    if let Some(label) = sample.spec.labels.get(K8S_NAME_LABEL)
        && !label.is_empty()
    {
        return label.clone();
    }
    let raw = sample.name.as_deref().unwrap_or(id);
    let truncated: String = raw.chars().take(12).collect();
    truncated.trim_start_matches('/').to_string()
}

/// Stopped when there are no stats or the newest stat is stale. An
/// unparsable timestamp counts as stale.
fn resolve_state(sample: &ContainerSample, now: DateTime<Utc>) -> ContainerState {
    let Some(last) = sample.stats.last() else {
        return ContainerState::Stopped;
    };
    match last.timestamp.as_deref().and_then(parse_timestamp) {
        Some(ts) if now.signed_duration_since(ts).num_seconds() <= FRESHNESS_SECS => {
            ContainerState::Running
        }
        _ => ContainerState::Stopped,
    }
}

fn resolve_restart_count(sample: &ContainerSample) -> u32 {
    sample
        .spec
        .labels
        .get(COMPOSE_RESTART_LABEL)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

fn resolve_uptime(sample: &ContainerSample, now: DateTime<Utc>) -> Option<u64> {
    let created = parse_timestamp(sample.spec.creation_time.as_deref()?)?;
    Some(now.signed_duration_since(created).num_seconds().max(0) as u64)
}

/// (size_rw, size_root_fs). cAdvisor rarely reports the writable layer, so
/// size_rw is usually absent: root-device capacity from the newest stat
/// wins, then explicit spec sizes, then the newest filesystem usage total.
fn resolve_fs_sizes(sample: &ContainerSample) -> (Option<u64>, Option<u64>) {
    if let Some(last) = sample.stats.last() {
        for fs in &last.filesystem {
            let device = fs.device.as_deref().unwrap_or("");
            if (device == "/" || device.to_ascii_lowercase().contains("root"))
                && let Some(capacity) = fs.capacity.filter(|&c| c > 0)
            {
                return (None, Some(capacity));
            }
        }
    }
    if let Some(spec_fs) = &sample.spec.filesystem
        && (spec_fs.size_rw.is_some() || spec_fs.size_root_fs.is_some())
    {
        return (spec_fs.size_rw, spec_fs.size_root_fs);
    }
    for stat in sample.stats.iter().rev() {
        for fs in &stat.filesystem {
            if let Some(usage) = fs.usage.filter(|&u| u > 0) {
                return (None, Some(usage));
            }
        }
    }
    (None, None)
}

/// Parse cAdvisor's RFC3339 timestamps. Tolerates more than nine fractional
/// digits (truncated) and a missing offset (assumed UTC). Returns None
/// rather than failing the row; callers treat unknown as "not fresh."
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if ts.is_empty() {
        return None;
    }
    let ts = clamp_fraction(ts);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&ts) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Cap fractional seconds at nine digits; chrono rejects anything longer.
fn clamp_fraction(ts: &str) -> Cow<'_, str> {
    let Some(dot) = ts.find('.') else {
        return Cow::Borrowed(ts);
    };
    let fraction = &ts[dot + 1..];
    let digits = fraction.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits <= 9 {
        return Cow::Borrowed(ts);
    }
    let mut out = String::with_capacity(ts.len());
    out.push_str(&ts[..=dot]);
    out.push_str(&fraction[..9]);
    out.push_str(&fraction[digits..]);
    Cow::Owned(out)
}
