//! Aggregator - read-side projections over the sample store.
//!
//! Both views recompute from the store on every call; there is no cache.
//! An empty store legitimately yields zeros / empty series, while a storage
//! failure propagates so callers can answer with a real error instead of
//! silently faking zeros.

use chrono::{DateTime, Duration, Utc};
use headcount_common::{HistoricalResponse, SummaryResponse};

use crate::store::{SampleStore, StoreError};

/// Trailing window for the peak and the historical series.
pub const WINDOW_HOURS: i64 = 24;

/// Current player count plus the trailing-24h peak.
pub fn summary(
    store: &SampleStore,
    game_name: &str,
    now: DateTime<Utc>,
) -> Result<SummaryResponse, StoreError> {
    let current_players = store
        .latest()?
        .map(|sample| sample.player_count)
        .unwrap_or(0);
    let max_players_24h = store.max_in_window(now - Duration::hours(WINDOW_HOURS))?;

    Ok(SummaryResponse {
        game_name: game_name.to_string(),
        current_players,
        max_players_24h,
    })
}

/// Chart-ready trailing-24h series: HH:MM labels and counts, parallel and
/// ascending by timestamp. No deduplication, no downsampling.
pub fn historical(
    store: &SampleStore,
    now: DateTime<Utc>,
) -> Result<HistoricalResponse, StoreError> {
    let samples = store.range_ascending(now - Duration::hours(WINDOW_HOURS))?;

    let mut labels = Vec::with_capacity(samples.len());
    let mut data = Vec::with_capacity(samples.len());
    for sample in &samples {
        labels.push(sample.timestamp.format("%H:%M").to_string());
        data.push(sample.player_count);
    }

    Ok(HistoricalResponse { labels, data })
}
