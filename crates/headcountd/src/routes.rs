//! API routes for headcountd.
//!
//! The read path recomputes from the store on every request. A storage
//! failure answers 500; an empty store answers honest zeros.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use headcount_common::{HealthResponse, HistoricalResponse, SummaryResponse};
use tracing::error;

use crate::aggregator;
use crate::server::AppState;

type AppStateArc = Arc<AppState>;

/// The embedded dashboard page.
pub fn page_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(index))
}

/// JSON endpoints consumed by the dashboard and headcountctl.
pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/summary", get(get_summary))
        .route("/api/analytics/historical", get(get_historical))
        .route("/healthz", get(healthz))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/dashboard.html"))
}

async fn get_summary(
    State(state): State<AppStateArc>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    aggregator::summary(&state.store, &state.config.game_name, Utc::now())
        .map(Json)
        .map_err(|e| {
            error!("summary query failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

async fn get_historical(
    State(state): State<AppStateArc>,
) -> Result<Json<HistoricalResponse>, (StatusCode, String)> {
    aggregator::historical(&state.store, Utc::now())
        .map(Json)
        .map_err(|e| {
            error!("historical query failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

async fn healthz(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
