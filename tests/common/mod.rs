// Shared test helpers: raw cAdvisor-shaped JSON builders.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;

pub fn stat(ts: DateTime<Utc>, cpu_total_ns: u64, mem_bytes: u64, pids: u64) -> Value {
    json!({
        "timestamp": ts.to_rfc3339(),
        "cpu": {"usage": {"total": cpu_total_ns}},
        "memory": {"usage": mem_bytes},
        "processes": {"process_count": pids},
    })
}

/// A container with two fresh stats one second apart, so it reads as
/// running with a computable CPU rate.
pub fn running_container(name: &str, mem_bytes: u64, mem_limit: u64) -> Value {
    let now = Utc::now();
    json!({
        "aliases": [name],
        "spec": {"memory": {"limit": mem_limit}},
        "stats": [
            stat(now - TimeDelta::seconds(1), 0, mem_bytes, 1),
            stat(now, 100_000_000, mem_bytes, 1),
        ],
    })
}

pub fn container_map(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(id, v)| (id.to_string(), v.clone()))
        .collect()
}
