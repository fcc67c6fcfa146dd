//! Sample store - append-only SQLite persistence for player count samples.
//!
//! One table, three query shapes. Writes arrive from a single poller task at
//! most once per poll interval, reads come from concurrent HTTP handlers; a
//! mutex around the connection serializes both, which is plenty at this rate.
//!
//! Timestamps are stored as RFC 3339 TEXT in UTC. With a uniform `+00:00`
//! offset the string ordering matches chronological ordering, so the window
//! queries compare timestamps directly in SQL.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use headcount_common::Sample;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS samples (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    player_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_samples_timestamp ON samples(timestamp);
"#;

/// Errors surfaced by the sample store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored timestamp is not RFC 3339: {0}")]
    Timestamp(String),

    #[error("sample store lock poisoned")]
    Poisoned,
}

/// Append-only store of player count samples.
pub struct SampleStore {
    conn: Mutex<Connection>,
}

impl SampleStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// Schema creation is idempotent; opening an existing database leaves its
    /// contents untouched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(SCHEMA_SQL)?;
        debug!("sample store opened at {}", path.as_ref().display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, useful for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Append one sample. Never rejects a structurally valid sample; fails
    /// only when the underlying database does, and a failed append leaves
    /// prior data intact (single-statement insert).
    pub fn append(&self, sample: &Sample) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO samples (timestamp, player_count) VALUES (?1, ?2)",
            rusqlite::params![sample.timestamp.to_rfc3339(), sample.player_count],
        )?;
        Ok(())
    }

    /// The most recent sample by timestamp, or `None` for an empty store.
    pub fn latest(&self) -> Result<Option<Sample>, StoreError> {
        let row = self
            .conn()?
            .query_row(
                "SELECT timestamp, player_count FROM samples
                 ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                |row| {
                    let timestamp: String = row.get(0)?;
                    let player_count: u64 = row.get(1)?;
                    Ok((timestamp, player_count))
                },
            )
            .optional()?;

        row.map(|(timestamp, player_count)| {
            Ok(Sample {
                timestamp: parse_timestamp(&timestamp)?,
                player_count,
            })
        })
        .transpose()
    }

    /// Maximum player count among samples with `timestamp >= since`; 0 when
    /// no samples qualify.
    pub fn max_in_window(&self, since: DateTime<Utc>) -> Result<u64, StoreError> {
        let max: u64 = self.conn()?.query_row(
            "SELECT COALESCE(MAX(player_count), 0) FROM samples WHERE timestamp >= ?1",
            [since.to_rfc3339()],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// All samples with `timestamp >= since`, ascending by timestamp.
    pub fn range_ascending(&self, since: DateTime<Utc>) -> Result<Vec<Sample>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, player_count FROM samples
             WHERE timestamp >= ?1
             ORDER BY timestamp ASC, id ASC",
        )?;

        let rows = stmt.query_map([since.to_rfc3339()], |row| {
            let timestamp: String = row.get(0)?;
            let player_count: u64 = row.get(1)?;
            Ok((timestamp, player_count))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            let (timestamp, player_count) = row?;
            samples.push(Sample {
                timestamp: parse_timestamp(&timestamp)?,
                player_count,
            });
        }
        Ok(samples)
    }

    /// Delete samples strictly older than `cutoff`. Only the retention task
    /// calls this, and only when retention is configured.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let deleted = self.conn()?.execute(
            "DELETE FROM samples WHERE timestamp < ?1",
            [cutoff.to_rfc3339()],
        )?;
        Ok(deleted)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(raw.to_string()))
}
