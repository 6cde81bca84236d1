//! Batch intake: parse, validate, acknowledge, hand off.
//!
//! The response never carries a job outcome. Once the batch is
//! acknowledged, progress is observable only through documents delivered
//! to the ingestion sink.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{RawForm, State};
use axum::response::Json;
use serde_json::{json, Value};
use tracing::info;

use secretscan_core::{dispatch_batch, ContextFields, ScanBatch};

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

const IMAGE_LIST_KEY: &str = "image_name_with_tag_list";
const SCAN_ID_LIST_KEY: &str = "scan_id_list";

pub async fn run_secret_scan(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> AppResult<Json<Value>> {
    let batch = parse_batch_form(&body)?;
    info!(jobs = batch.len(), "scan batch accepted");

    // Fire-and-forget: the dispatcher runs on its own task and the
    // acknowledgment goes out immediately.
    tokio::spawn(dispatch_batch(Arc::clone(&state.pool), batch));

    Ok(Json(json!({ "status": "Scan Queued" })))
}

pub async fn test_echo() -> &'static str {
    "Hello World!"
}

/// Decode the form into a validated batch.
///
/// The two batch-level lists become the parallel job sequences. Every
/// other key becomes a passthrough field if and only if it is
/// single-valued; a repeated key is list-valued and is dropped entirely so
/// no per-job document can leak batch-wide data.
fn parse_batch_form(body: &[u8]) -> Result<ScanBatch, AppError> {
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body)
        .into_owned()
        .collect();

    let mut images = Vec::new();
    let mut scan_ids = Vec::new();
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for (key, _) in &pairs {
        *occurrences.entry(key.as_str()).or_default() += 1;
    }

    let mut context: ContextFields = Vec::new();
    for (key, value) in &pairs {
        match key.as_str() {
            IMAGE_LIST_KEY => {
                if !value.is_empty() {
                    images.push(value.clone());
                }
            }
            SCAN_ID_LIST_KEY => {
                if !value.is_empty() {
                    scan_ids.push(value.clone());
                }
            }
            key if occurrences[key] == 1 => context.push((key.to_string(), value.clone())),
            _ => {}
        }
    }

    Ok(ScanBatch::new(images, scan_ids, context)?)
}
