//! HTTP server for headcountd.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::DaemonConfig;
use crate::routes;
use crate::store::SampleStore;

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<SampleStore>,
    pub config: DaemonConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<SampleStore>, config: DaemonConfig) -> Self {
        Self {
            store,
            config,
            start_time: Instant::now(),
        }
    }
}

/// Build the full router. Split out from `run` so integration tests can
/// drive it against an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process exits.
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
