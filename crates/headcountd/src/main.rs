//! Headcount Daemon - polls the Roblox Games API and serves player stats.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use headcountd::config::DaemonConfig;
use headcountd::fetcher::PlayerCountFetcher;
use headcountd::poller;
use headcountd::server::{self, AppState};
use headcountd::store::SampleStore;

#[derive(Parser)]
#[command(name = "headcountd")]
#[command(about = "Roblox player count tracker daemon", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the config file (default: /etc/headcount/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = DaemonConfig::load(args.config.as_deref())?;

    info!(
        "headcountd v{} starting (universe {}, every {}s)",
        env!("CARGO_PKG_VERSION"),
        config.universe_id,
        config.poll_interval_secs
    );

    let store = Arc::new(SampleStore::open(&config.database_path)?);
    let fetcher = PlayerCountFetcher::new(&config)?;

    poller::spawn(fetcher, Arc::clone(&store), config.poll_interval());
    if let Some(days) = config.retention_days {
        poller::spawn_retention(Arc::clone(&store), days);
    }

    server::run(AppState::new(store, config)).await
}
