//! Command handlers for headcountctl.

use anyhow::{bail, Context, Result};
use headcount_common::{HealthResponse, HistoricalResponse, SummaryResponse};
use owo_colors::OwoColorize;
use serde::de::DeserializeOwned;

const BAR_WIDTH: u64 = 40;

pub async fn summary(addr: &str) -> Result<()> {
    let summary: SummaryResponse = get_json(addr, "/api/summary").await?;

    println!("{}", summary.game_name.bold());
    println!(
        "  Players online: {}",
        summary.current_players.to_string().green()
    );
    println!(
        "  24h peak:       {}",
        summary.max_players_24h.to_string().cyan()
    );
    Ok(())
}

pub async fn history(addr: &str) -> Result<()> {
    let series: HistoricalResponse = get_json(addr, "/api/analytics/historical").await?;

    if series.data.is_empty() {
        println!("No samples in the last 24 hours.");
        return Ok(());
    }

    // Scale bars against the window peak.
    let peak = series.data.iter().copied().max().unwrap_or(0).max(1);
    for (label, count) in series.labels.iter().zip(&series.data) {
        let bar = "█".repeat((count * BAR_WIDTH / peak) as usize);
        println!("{}  {:>9}  {}", label.dimmed(), count, bar.blue());
    }
    Ok(())
}

pub async fn status(addr: &str) -> Result<()> {
    let health: HealthResponse = get_json(addr, "/healthz").await?;

    println!(
        "headcountd {} is {} (up {}s)",
        health.version,
        health.status.green(),
        health.uptime_secs
    );
    Ok(())
}

async fn get_json<T: DeserializeOwned>(addr: &str, path: &str) -> Result<T> {
    let url = format!("{}{}", addr.trim_end_matches('/'), path);

    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach the daemon - is headcountd running at {addr}?"))?;

    if !response.status().is_success() {
        bail!("daemon answered HTTP {} for {}", response.status(), url);
    }

    response
        .json()
        .await
        .context("Failed to decode daemon response")
}
