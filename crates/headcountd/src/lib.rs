//! Headcount Daemon - Roblox player count tracker
//!
//! Polls the Roblox Games API on a fixed interval, persists every sample in
//! SQLite, and serves the current/peak summary plus a trailing 24-hour series
//! over a local HTTP API.

pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod poller;
pub mod routes;
pub mod server;
pub mod store;
