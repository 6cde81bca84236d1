//! Standalone mode: one image per request, scanned inline, report
//! returned in the response body. No pool, no batching, no ingestion.

use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use secretscan_core::ScanJob;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StandaloneRequest {
    pub image_name_with_tag: String,
}

pub async fn run_secret_scan_standalone(
    State(state): State<AppState>,
    Json(request): Json<StandaloneRequest>,
) -> AppResult<Json<Value>> {
    let image_name = request.image_name_with_tag.trim().to_string();
    if image_name.is_empty() {
        return Err(AppError::bad_request("image_name_with_tag is required"));
    }

    let scan_id = Uuid::new_v4().to_string();
    info!(image = %image_name, scan_id = %scan_id, "standalone secret scan triggered");

    let job = ScanJob::new(image_name.clone(), scan_id, Vec::new());
    let report = state.pipeline.run_inline(&job).await.map_err(|err| {
        error!(image = %image_name, error = %err, "standalone scan failed");
        AppError::bad_gateway(format!("image scan failed: {err}"))
    })?;

    Ok(Json(report))
}

pub async fn ping() -> &'static str {
    "pong"
}
