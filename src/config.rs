use clap::{Parser, ValueEnum};
use std::time::Duration;

/// What the binary does after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// SNMP pass_persist loop on stdin/stdout (default).
    Agent,
    /// One-shot JSON snapshot on stdout, then exit.
    Json,
    /// Fetch once and print a human-readable summary, then exit.
    Check,
}

#[derive(Parser, Debug)]
#[command(
    name = "cadvisor-snmp-agent",
    about = "SNMP pass_persist agent exposing cAdvisor container metrics",
    version
)]
pub struct Cli {
    /// cAdvisor base URL; the flag wins over the environment variable.
    #[arg(long, env = "CADVISOR_URL", default_value = "http://127.0.0.1:8080")]
    pub url: String,

    #[arg(long, value_enum, default_value = "agent")]
    pub mode: Mode,

    /// Upstream fetch timeout in seconds.
    #[arg(long, default_value_t = 2)]
    pub fetch_timeout_secs: u64,

    /// Snapshot cache time-to-live in seconds.
    #[arg(long, default_value_t = 5)]
    pub cache_ttl_secs: u64,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub url: String,
    pub mode: Mode,
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
}

impl AgentConfig {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        anyhow::ensure!(!cli.url.trim().is_empty(), "url must be non-empty");
        anyhow::ensure!(
            cli.url.starts_with("http://") || cli.url.starts_with("https://"),
            "url must start with http:// or https://, got {}",
            cli.url
        );
        anyhow::ensure!(
            cli.fetch_timeout_secs > 0,
            "fetch-timeout-secs must be > 0, got {}",
            cli.fetch_timeout_secs
        );
        anyhow::ensure!(
            cli.cache_ttl_secs > 0,
            "cache-ttl-secs must be > 0, got {}",
            cli.cache_ttl_secs
        );
        Ok(Self {
            url: cli.url,
            mode: cli.mode,
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
            cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
        })
    }
}
