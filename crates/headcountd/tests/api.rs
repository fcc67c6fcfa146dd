//! End-to-end checks of the HTTP API over a real listener.

use std::sync::Arc;

use chrono::{Duration, Utc};
use headcount_common::{HealthResponse, HistoricalResponse, Sample, SummaryResponse};
use headcountd::config::DaemonConfig;
use headcountd::server::{router, AppState};
use headcountd::store::SampleStore;

/// Serve the app on an ephemeral port and return its base URL.
async fn spawn_app(store: SampleStore) -> String {
    let config = DaemonConfig {
        game_name: "Adopt Me!".to_string(),
        ..DaemonConfig::default()
    };
    let state = Arc::new(AppState::new(Arc::new(store), config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn summary_reflects_latest_and_windowed_peak() {
    let store = SampleStore::open_in_memory().unwrap();
    let now = Utc::now();
    // Outside the 24h window.
    store.append(&Sample::at(now - Duration::hours(30), 200)).unwrap();
    // Inside the window.
    store.append(&Sample::at(now - Duration::hours(2), 70)).unwrap();
    store.append(&Sample::at(now - Duration::hours(1), 90)).unwrap();

    let base = spawn_app(store).await;
    let summary: SummaryResponse = reqwest::get(format!("{base}/api/summary"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary.game_name, "Adopt Me!");
    assert_eq!(summary.current_players, 90);
    assert_eq!(summary.max_players_24h, 90);
}

#[tokio::test]
async fn summary_of_an_empty_store_is_zeros_not_an_error() {
    let base = spawn_app(SampleStore::open_in_memory().unwrap()).await;

    let response = reqwest::get(format!("{base}/api/summary")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let summary: SummaryResponse = response.json().await.unwrap();
    assert_eq!(summary.current_players, 0);
    assert_eq!(summary.max_players_24h, 0);
}

#[tokio::test]
async fn historical_returns_the_windowed_series_ascending() {
    let store = SampleStore::open_in_memory().unwrap();
    let now = Utc::now();
    store.append(&Sample::at(now - Duration::hours(30), 50)).unwrap();
    store.append(&Sample::at(now - Duration::hours(2), 70)).unwrap();
    store.append(&Sample::at(now - Duration::hours(1), 90)).unwrap();

    let base = spawn_app(store).await;
    let series: HistoricalResponse = reqwest::get(format!("{base}/api/analytics/historical"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(series.data, vec![70, 90]);
    assert_eq!(series.labels.len(), 2);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let base = spawn_app(SampleStore::open_in_memory().unwrap()).await;

    let health: HealthResponse = reqwest::get(format!("{base}/healthz"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn index_serves_the_dashboard_page() {
    let base = spawn_app(SampleStore::open_in_memory().unwrap()).await;

    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("history-chart"));
    assert!(body.contains("/api/summary"));
}
