//! Configuration management for headcountd.
//!
//! Loads settings from /etc/headcount/config.toml (or a path given with
//! `--config`) and falls back to defaults when the file is absent. Every
//! field carries a serde default so partial config files work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/headcount/config.toml";

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Roblox universe ID to track
    #[serde(default = "default_universe_id")]
    pub universe_id: u64,

    /// Display name shown in the summary (not fetched from the API)
    #[serde(default = "default_game_name")]
    pub game_name: String,

    /// Base URL of the Roblox Games API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Seconds between polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-attempt HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Total attempts when the upstream answers 429
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles per retry
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// SQLite database path
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Drop samples older than this many days. Unset means keep everything.
    #[serde(default)]
    pub retention_days: Option<u32>,
}

fn default_universe_id() -> u64 {
    920587237 // Adopt Me!
}

fn default_game_name() -> String {
    "Adopt Me!".to_string()
}

fn default_api_base_url() -> String {
    "https://games.roblox.com".to_string()
}

fn default_poll_interval() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    1000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("/var/lib/headcount/headcount.db")
}

fn default_listen_addr() -> String {
    "127.0.0.1:7878".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            universe_id: default_universe_id(),
            game_name: default_game_name(),
            api_base_url: default_api_base_url(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            database_path: default_database_path(),
            listen_addr: default_listen_addr(),
            retention_days: None,
        }
    }
}

impl DaemonConfig {
    /// Load configuration from `path` (default: CONFIG_PATH). A missing file
    /// is not an error; a present-but-invalid file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));

        if !path.exists() {
            warn!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = DaemonConfig::default();
        assert_eq!(config.poll_interval_secs, 300);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 1000);
        assert_eq!(config.retention_days, None);
        assert_eq!(config.api_base_url, "https://games.roblox.com");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: DaemonConfig = toml::from_str(
            r#"
            universe_id = 123456
            game_name = "Some Other Game"
            retention_days = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.universe_id, 123456);
        assert_eq!(config.game_name, "Some Other Game");
        assert_eq!(config.retention_days, Some(30));
        assert_eq!(config.poll_interval_secs, 300);
        assert_eq!(config.listen_addr, "127.0.0.1:7878");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = DaemonConfig::load(Some(Path::new("/nonexistent/headcount.toml"))).unwrap();
        assert_eq!(config.universe_id, default_universe_id());
    }
}
