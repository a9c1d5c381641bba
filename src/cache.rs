// TTL-bounded snapshot cache between the protocol loop and cAdvisor.

use crate::cadvisor_repo::{ContainerSource, build_rows};
use crate::models::Snapshot;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

struct Cached {
    rows: Arc<Snapshot>,
    fetched_at: Instant,
}

/// Holds the most recent fully built snapshot and refreshes it at most once
/// per TTL. The mutex is held across the refresh, so only one refresh is
/// ever in flight and callers see either the old snapshot or the new one,
/// never a partial build. The upstream timeout bounds the hold.
pub struct SnapshotCache<S> {
    source: S,
    ttl: Duration,
    state: Mutex<Option<Cached>>,
}

impl<S: ContainerSource> SnapshotCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(None),
        }
    }

    /// The current snapshot, refreshed when absent or older than the TTL.
    /// A failed refresh logs and falls back to the previous snapshot, or an
    /// empty one before the first success; either way the age is reset so a
    /// dead upstream is retried at TTL cadence rather than per command.
    pub async fn current(&self) -> Arc<Snapshot> {
        let mut state = self.state.lock().await;
        if let Some(cached) = state.as_ref()
            && cached.fetched_at.elapsed() <= self.ttl
        {
            return cached.rows.clone();
        }

        match self.source.fetch().await {
            Ok(data) => {
                let rows = Arc::new(build_rows(&data, Utc::now()));
                debug!(containers = rows.len(), "snapshot refreshed");
                *state = Some(Cached {
                    rows: rows.clone(),
                    fetched_at: Instant::now(),
                });
                rows
            }
            Err(e) => {
                warn!(error = %e, "refresh failed; serving previous snapshot");
                match state.as_mut() {
                    Some(cached) => {
                        cached.fetched_at = Instant::now();
                        cached.rows.clone()
                    }
                    None => {
                        let empty = Arc::new(Vec::new());
                        *state = Some(Cached {
                            rows: empty.clone(),
                            fetched_at: Instant::now(),
                        });
                        empty
                    }
                }
            }
        }
    }
}
