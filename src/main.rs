use anyhow::Result;
use cadvisor_snmp_agent::*;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout belongs to the pass_persist protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::AgentConfig::from_cli(config::Cli::parse())?;
    let repo = cadvisor_repo::CadvisorRepo::new(&config.url, config.fetch_timeout)?;

    match config.mode {
        config::Mode::Json => report::run_json(&repo).await,
        config::Mode::Check => report::run_check(&repo, &config.url).await,
        config::Mode::Agent => {
            tracing::info!(
                version = version::VERSION,
                url = %repo.url(),
                "starting pass_persist agent"
            );
            let cache = cache::SnapshotCache::new(repo, config.cache_ttl);
            let stdin = BufReader::new(tokio::io::stdin());
            let stdout = tokio::io::stdout();
            protocol::run(&cache, stdin, stdout).await?;
            tracing::info!("input stream closed; shutting down");
            Ok(())
        }
    }
}
