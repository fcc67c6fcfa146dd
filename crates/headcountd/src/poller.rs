//! Poller - drives the fetcher on a fixed interval and commits results.
//!
//! One spawned task owns the write path. The tick body is awaited inline, so
//! at most one fetch-and-store is ever in flight; with
//! `MissedTickBehavior::Skip` a tick that lands while the previous fetch (or
//! its backoff sleep) is still running is skipped outright, never queued.
//!
//! No failure in a tick stops the loop. Rate limiting and malformed bodies
//! are expected upstream weather and log at warn; anything else logs at
//! error. The next tick starts from scratch either way.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use headcount_common::Sample;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::fetcher::{FetchError, PlayerCountFetcher};
use crate::store::SampleStore;

/// How often the retention task sweeps, when retention is configured.
const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Spawn the poll loop. Runs until the process exits.
pub fn spawn(
    fetcher: PlayerCountFetcher,
    store: Arc<SampleStore>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    info!(
        interval_secs = poll_interval.as_secs(),
        "starting poll loop"
    );

    tokio::spawn(async move {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            poll_once(&fetcher, &store).await;
        }
    })
}

/// One tick: fetch a sample and append it. Every outcome is logged and
/// contained here; the caller never sees an error.
pub async fn poll_once(fetcher: &PlayerCountFetcher, store: &SampleStore) {
    match fetcher.fetch().await {
        Ok(player_count) => {
            let sample = Sample::now(player_count);
            match store.append(&sample) {
                Ok(()) => info!(player_count, "sample stored"),
                Err(e) => error!("failed to store sample: {e}"),
            }
        }
        Err(e @ FetchError::RateLimited { .. }) => {
            warn!("{e}; no sample this tick");
        }
        Err(e @ FetchError::MalformedResponse(_)) => {
            warn!("{e}; skipping save");
        }
        Err(e) => {
            error!("fetch failed: {e}");
        }
    }
}

/// Spawn the retention sweep. Only started when `retention_days` is set;
/// the store itself never deletes anything on its own.
pub fn spawn_retention(store: Arc<SampleStore>, retention_days: u32) -> JoinHandle<()> {
    info!(retention_days, "starting retention sweep");

    tokio::spawn(async move {
        let mut ticker = interval(RETENTION_SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let cutoff = Utc::now() - chrono::Duration::days(i64::from(retention_days));
            match store.prune_before(cutoff) {
                Ok(0) => {}
                Ok(deleted) => info!(deleted, "pruned expired samples"),
                Err(e) => error!("retention sweep failed: {e}"),
            }
        }
    })
}
