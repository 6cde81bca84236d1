use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{batch, standalone};
use crate::state::AppState;

/// Batch-mode router: asynchronous intake plus a liveness echo.
pub fn batch_router(state: AppState) -> Router {
    Router::new()
        .route("/secret-scan", post(batch::run_secret_scan))
        .route("/secret-scan/test", get(batch::test_echo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Standalone-mode router: synchronous single-image scans.
pub fn standalone_router(state: AppState) -> Router {
    Router::new()
        .route("/secret-scan", post(standalone::run_secret_scan_standalone))
        .route("/secret-scan/ping", get(standalone::ping))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
