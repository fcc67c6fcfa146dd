//! Headcount Common - Shared types between the daemon and the CLI client.
//!
//! Everything here crosses the HTTP boundary as JSON, so the field names are
//! part of the public API and must stay stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped observation of the live player count.
///
/// Timestamps are assigned at write time (UTC). Samples are immutable once
/// stored; insertion order follows fetch completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub player_count: u64,
}

impl Sample {
    /// Create a sample stamped with the current wall clock.
    pub fn now(player_count: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            player_count,
        }
    }

    /// Create a sample with an explicit timestamp (backfill, tests).
    pub fn at(timestamp: DateTime<Utc>, player_count: u64) -> Self {
        Self {
            timestamp,
            player_count,
        }
    }
}

/// Response body for `GET /api/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub game_name: String,
    pub current_players: u64,
    pub max_players_24h: u64,
}

/// Response body for `GET /api/analytics/historical`.
///
/// `labels` and `data` are parallel sequences: `labels[i]` is the HH:MM
/// wall-clock label of the i-th sample in the trailing window, `data[i]`
/// its player count, both ascending by timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalResponse {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

/// Response body for `GET /healthz`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
