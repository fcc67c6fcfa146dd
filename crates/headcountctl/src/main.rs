//! Headcount Control - CLI client for the headcount daemon.
//!
//! Talks to headcountd over its local HTTP API and renders the answers for
//! a terminal.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "headcountctl")]
#[command(about = "Query the headcount player tracking daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon address
    #[arg(long, default_value = "http://127.0.0.1:7878")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current player count and 24h peak
    Summary,

    /// Show the trailing 24h series as a bar chart
    History,

    /// Show daemon health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary => commands::summary(&cli.addr).await,
        Commands::History => commands::history(&cli.addr).await,
        Commands::Status => commands::status(&cli.addr).await,
    }
}
