//! Fetcher - one-shot player count retrieval from the Roblox Games API.
//!
//! A fetch makes at most `max_retries` HTTP attempts, and retries only on
//! HTTP 429 with exponential backoff (initial_backoff, 2x per retry). Every
//! other failure ends the fetch immediately; the poller treats each kind
//! according to the error taxonomy below and the next tick starts clean.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DaemonConfig;

/// Ceiling for a single backoff sleep, whatever the retry budget says.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// How a single fetch can fail. None of these stop the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Upstream answered 429 on every attempt. Soft failure: the tick simply
    /// produces no sample.
    #[error("rate limited by upstream after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// 200 response whose body does not carry a usable player count.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Any status other than 200 or 429. Not retried.
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(StatusCode),

    /// Timeout or connection-level failure. Not retried.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Expected shape of the Games API response:
/// `{"data": [{"playing": <int>, ...}, ...]}`.
#[derive(Debug, Deserialize)]
struct GamesResponse {
    data: Vec<GameRecord>,
}

#[derive(Debug, Deserialize)]
struct GameRecord {
    playing: Option<u64>,
}

/// Fetches the live player count for one configured universe.
pub struct PlayerCountFetcher {
    http: reqwest::Client,
    endpoint: String,
    max_retries: u32,
    initial_backoff: Duration,
}

impl PlayerCountFetcher {
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("headcountd/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let endpoint = format!(
            "{}/v1/games?universeIds={}",
            config.api_base_url.trim_end_matches('/'),
            config.universe_id
        );

        Ok(Self {
            http,
            endpoint,
            max_retries: config.max_retries.max(1),
            initial_backoff: config.initial_backoff(),
        })
    }

    /// Fetch the current player count. Performs no persistence; the caller
    /// decides what to do with the value.
    pub async fn fetch(&self) -> Result<u64, FetchError> {
        let mut attempts = 0;

        while attempts < self.max_retries {
            attempts += 1;
            let response = self.http.get(&self.endpoint).send().await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    return parse_player_count(&body);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    if attempts < self.max_retries {
                        let delay = self.backoff_delay(attempts);
                        warn!(
                            attempt = attempts,
                            max = self.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "rate limited, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                status => return Err(FetchError::UpstreamStatus(status)),
            }
        }

        Err(FetchError::RateLimited { attempts })
    }

    /// Delay before attempt `attempt + 1`: 1s, 2s, 4s, ... doubling per
    /// retry, saturating instead of overflowing and capped at MAX_BACKOFF so
    /// an oversized retry budget in the config cannot panic the poll task.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

fn parse_player_count(body: &str) -> Result<u64, FetchError> {
    let parsed: GamesResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON body: {e}")))?;

    let record = parsed
        .data
        .first()
        .ok_or_else(|| FetchError::MalformedResponse("empty 'data' collection".to_string()))?;

    let playing = record.playing.ok_or_else(|| {
        FetchError::MalformedResponse("first game record has no 'playing' field".to_string())
    })?;

    debug!(player_count = playing, "parsed upstream response");
    Ok(playing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_saturates_at_the_cap() {
        let fetcher = PlayerCountFetcher::new(&DaemonConfig::default()).unwrap();

        assert_eq!(fetcher.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(fetcher.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(fetcher.backoff_delay(3), Duration::from_secs(4));
        assert_eq!(fetcher.backoff_delay(7), MAX_BACKOFF);
        // Past the u32 pow range: saturates instead of panicking.
        assert_eq!(fetcher.backoff_delay(40), MAX_BACKOFF);
        assert_eq!(fetcher.backoff_delay(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn parses_the_first_record() {
        let body = r#"{"data":[{"id":920587237,"name":"Adopt Me!","playing":145021},{"playing":3}]}"#;
        assert_eq!(parse_player_count(body).unwrap(), 145021);
    }

    #[test]
    fn empty_data_is_malformed() {
        let err = parse_player_count(r#"{"data":[]}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn missing_playing_field_is_malformed() {
        let err = parse_player_count(r#"{"data":[{"id":1,"name":"x"}]}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn missing_data_field_is_malformed() {
        let err = parse_player_count(r#"{"games":[]}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_player_count("<html>service unavailable</html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }
}
