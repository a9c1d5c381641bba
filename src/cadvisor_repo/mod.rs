// Container metrics from the cAdvisor HTTP API.

mod cpu;
mod rows;

pub use rows::{build_row, build_rows, parse_timestamp, stable_seed};

use crate::errors::FetchError;
use std::collections::HashMap;
use std::time::Duration;

/// Path of the per-container Docker endpoint under the cAdvisor base URL.
pub const DOCKER_ENDPOINT: &str = "/api/v1.3/docker";

/// Raw upstream document: container id -> untyped record. Records stay
/// untyped here so one malformed container fails alone at row-build time.
pub type ContainerMap = HashMap<String, serde_json::Value>;

/// The one fetch operation the rest of the agent depends on. A trait seam so
/// the cache and protocol loop can be exercised without a live daemon.
#[allow(async_fn_in_trait)]
pub trait ContainerSource {
    async fn fetch(&self) -> Result<ContainerMap, FetchError>;
}

pub struct CadvisorRepo {
    client: reqwest::Client,
    url: String,
}

impl CadvisorRepo {
    /// `timeout` bounds the whole request; a stalled daemon must not freeze
    /// protocol responses.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), DOCKER_ENDPOINT),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ContainerSource for CadvisorRepo {
    async fn fetch(&self) -> Result<ContainerMap, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Unreachable)?;
        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status()));
        }
        response
            .json::<ContainerMap>()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}
