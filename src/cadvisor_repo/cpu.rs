// Instantaneous CPU utilization from cAdvisor's cumulative counters.

use crate::models::{ContainerSample, CpuSpec};

use super::rows::parse_timestamp;

/// How many trailing stats to consider for the sampling window.
const WINDOW_STATS: usize = 5;
/// Preferred minimum window width in seconds.
const STABLE_WINDOW_SECS: f64 = 1.0;
/// Fallback minimum window width, also the floor for the elapsed time.
const MIN_WINDOW_SECS: f64 = 0.1;

/// One timestamped cumulative-counter sample.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CpuPoint {
    /// Unix seconds.
    pub at: f64,
    /// Cumulative CPU nanoseconds, all cores.
    pub total_ns: u64,
}

/// CPU utilization in percent of one logical core's 100%, clamped to
/// [0, 100] and rounded to two decimals. Returns 0.0 when fewer than two
/// usable samples exist.
pub(crate) fn cpu_percent(container: &ContainerSample) -> f64 {
    let points = valid_points(container);
    estimate(&points, core_divisor(&container.spec.cpu))
}

/// Collect usable (timestamp, counter) points from the trailing stats,
/// oldest first. Unparseable timestamps or missing counters are skipped.
fn valid_points(container: &ContainerSample) -> Vec<CpuPoint> {
    let stats = &container.stats;
    let tail = &stats[stats.len().saturating_sub(WINDOW_STATS)..];
    tail.iter()
        .filter_map(|stat| {
            let total_ns = stat.cpu.usage.total?;
            let ts = parse_timestamp(stat.timestamp.as_deref()?)?;
            let at = ts.timestamp() as f64 + f64::from(ts.timestamp_subsec_nanos()) / 1e9;
            Some(CpuPoint { at, total_ns })
        })
        .collect()
}

/// Pure rate computation over prepared points. Exposed for unit tests.
pub(crate) fn estimate(points: &[CpuPoint], cores: f64) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let (earlier, later, dt) = select_window(points);

    let delta = later.total_ns as i128 - earlier.total_ns as i128;
    if delta < 0 && delta.unsigned_abs() > (earlier.total_ns / 2) as u128 {
        // Counter reset (container restart); one zero reading beats a spike.
        return 0.0;
    }
    let delta_ns = delta.max(0) as f64;

    let rate = (delta_ns / 1e9) / dt;
    let pct = (rate * 100.0 / cores.max(1.0)).min(100.0);
    (pct * 100.0).round() / 100.0
}

/// Pick the widest window >= 1s, else the widest >= 0.1s, else the full
/// oldest/newest span floored at 0.1s to avoid division by zero.
fn select_window(points: &[CpuPoint]) -> (CpuPoint, CpuPoint, f64) {
    let mut stable: Option<(usize, usize, f64)> = None;
    let mut fallback: Option<(usize, usize, f64)> = None;
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let dt = points[j].at - points[i].at;
            if dt >= STABLE_WINDOW_SECS {
                if stable.is_none_or(|(_, _, best)| dt > best) {
                    stable = Some((i, j, dt));
                }
            } else if dt >= MIN_WINDOW_SECS && fallback.is_none_or(|(_, _, best)| dt > best) {
                fallback = Some((i, j, dt));
            }
        }
    }
    if let Some((i, j, dt)) = stable.or(fallback) {
        return (points[i], points[j], dt);
    }
    let first = points[0];
    let last = points[points.len() - 1];
    (first, last, (last.at - first.at).max(MIN_WINDOW_SECS))
}

/// Logical-core divisor: an explicit limit >= 1e9 is nanocores, otherwise
/// fall back to the core count, otherwise one core.
fn core_divisor(cpu: &CpuSpec) -> f64 {
    match cpu.limit {
        Some(limit) if limit >= 1_000_000_000 => limit as f64 / 1e9,
        _ => match cpu.count {
            Some(count) if count > 0 => count as f64,
            _ => 1.0,
        },
    }
}
