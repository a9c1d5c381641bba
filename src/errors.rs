// Error taxonomy for upstream fetches and per-container conversion.

use thiserror::Error;

/// A whole-fetch failure. Recoverable in agent mode (stale-cache fallback),
/// fatal in the one-shot modes.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cAdvisor unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("cAdvisor returned HTTP {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("malformed cAdvisor response: {0}")]
    MalformedResponse(String),
}

/// One container's record is unusable. The caller skips the container and
/// keeps building the rest of the snapshot.
#[derive(Debug, Error)]
#[error("container {id}: {reason}")]
pub struct SampleError {
    pub id: String,
    pub reason: String,
}

impl SampleError {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
