//! Pure document construction, no I/O.
//!
//! Status and result documents share an identity block (`node_id` and
//! `node_name` both carry the image name, which is the join key consumers
//! correlate on), a timestamp pair, and the job's scalar passthrough
//! fields. Batch-level list fields are never copied into a per-job
//! document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::types::{Finding, ScanJob, ScanReport, ScanStatus};

/// Sink index receiving one document per finding.
pub const RESULT_INDEX: &str = "secret-scan";
/// Sink index receiving per-job status documents.
pub const STATUS_INDEX: &str = "secret-scan-logs";

/// Form keys that hold the whole batch. They must never leak into a
/// per-job document, so the builder refuses them even if a caller managed
/// to smuggle them into the passthrough fields.
const BATCH_LIST_KEYS: [&str; 2] = ["image_name_with_tag_list", "scan_id_list"];

/// One logical creation instant, captured once and shared by every
/// document that should correlate on an exact timestamp.
#[derive(Debug, Clone, Copy)]
pub struct DocTimestamps {
    /// Epoch milliseconds; the monotonic/logical ordering key.
    pub time_stamp: i64,
    /// Wall clock, rendered as RFC 3339 under `@timestamp`.
    pub wall_clock: DateTime<Utc>,
}

impl DocTimestamps {
    pub fn now() -> Self {
        let wall_clock = Utc::now();
        Self {
            time_stamp: wall_clock.timestamp_millis(),
            wall_clock,
        }
    }
}

/// Build a status document for the job's current state. `scan_message` is
/// present only when the job is in error.
pub fn status_document(job: &ScanJob, stamps: &DocTimestamps) -> Value {
    let mut doc = base_document(job, stamps);
    doc.insert(
        "scan_status".to_string(),
        Value::from(job.status().as_str()),
    );
    if job.status() == ScanStatus::Error {
        if let Some(message) = job.error_message() {
            doc.insert("scan_message".to_string(), Value::from(message));
        }
    }
    Value::Object(doc)
}

/// Build one result document for a single finding, flattening the
/// finding's statically declared field list into the document root.
pub fn result_document(job: &ScanJob, finding: &Finding, stamps: &DocTimestamps) -> Value {
    let mut doc = base_document(job, stamps);
    for (key, value) in finding.document_fields() {
        doc.insert(key.to_string(), value);
    }
    Value::Object(doc)
}

/// Build the synchronous single-shot report returned by standalone mode.
/// Same identity/timestamp/passthrough rules as the ingested documents;
/// the findings ride along as a nested array instead of being shipped
/// one-by-one.
pub fn inline_report(job: &ScanJob, report: &ScanReport, stamps: &DocTimestamps) -> Value {
    let mut doc = base_document(job, stamps);
    doc.insert("image_id".to_string(), Value::from(report.image_id.clone()));
    doc.insert(
        "findings".to_string(),
        Value::Array(
            report
                .findings
                .iter()
                .map(|finding| {
                    Value::Object(
                        finding
                            .document_fields()
                            .into_iter()
                            .map(|(k, v)| (k.to_string(), v))
                            .collect(),
                    )
                })
                .collect(),
        ),
    );
    Value::Object(doc)
}

/// Passthrough fields first, identity and timestamps last, so a stray
/// `node_id` or `scan_id` in the caller's form can never displace the
/// job's own identity.
fn base_document(job: &ScanJob, stamps: &DocTimestamps) -> Map<String, Value> {
    let mut doc = Map::new();
    for (key, value) in &job.context {
        if BATCH_LIST_KEYS.contains(&key.as_str()) {
            continue;
        }
        doc.insert(key.clone(), Value::from(value.clone()));
    }
    doc.insert("node_id".to_string(), Value::from(job.image_name.clone()));
    doc.insert("node_name".to_string(), Value::from(job.image_name.clone()));
    doc.insert("scan_id".to_string(), Value::from(job.scan_id.clone()));
    doc.insert("time_stamp".to_string(), Value::from(stamps.time_stamp));
    doc.insert(
        "@timestamp".to_string(),
        Value::from(
            stamps
                .wall_clock
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
    );
    doc
}
