//! The per-job pipeline: acquire, announce, scan, publish.
//!
//! Stages run strictly in order on one worker. Once a batch has been
//! acknowledged nothing here surfaces an error to the original caller;
//! failures end up in status documents and the process log.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::documents::{
    inline_report, result_document, status_document, DocTimestamps, RESULT_INDEX, STATUS_INDEX,
};
use crate::error::ScanError;
use crate::external::{ArtifactFetcher, DocumentSink, SecretEngine};
use crate::types::{JobOutcome, ScanJob, ScanStatus};

pub struct JobPipeline {
    fetcher: Arc<dyn ArtifactFetcher>,
    engine: Arc<dyn SecretEngine>,
    sink: Arc<dyn DocumentSink>,
}

impl JobPipeline {
    pub fn new(
        fetcher: Arc<dyn ArtifactFetcher>,
        engine: Arc<dyn SecretEngine>,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self {
            fetcher,
            engine,
            sink,
        }
    }

    /// Drive one job through every stage. Always returns an outcome with a
    /// terminal status, and always emits a terminal status document.
    pub async fn run(&self, mut job: ScanJob) -> JobOutcome {
        info!(image = %job.image_name, scan_id = %job.scan_id, "starting scan job");

        // Stage 1: acquire the artifact.
        let workdir = match self.fetcher.fetch(&job).await {
            Ok(dir) => dir,
            Err(err) => {
                error!(
                    image = %job.image_name,
                    scan_id = %job.scan_id,
                    error = %err,
                    "artifact acquisition failed"
                );
                job.fail(format!("image acquisition failed: {err}"));
                self.emit_status(&job, &DocTimestamps::now()).await;
                return JobOutcome::from_job(&job, 0);
            }
        };

        // Stage 2: announce the job before scanning.
        self.advance(&mut job, ScanStatus::InProgress);
        self.emit_status(&job, &DocTimestamps::now()).await;

        // Stage 3: scan. The outcome of this call alone decides the
        // terminal status; per-document ingest failures below never do.
        let scan_result = self.engine.scan(&job.image_name, workdir.path()).await;

        // One timestamp pair for every document emitted after the scan, so
        // results and the terminal status correlate exactly.
        let stamps = DocTimestamps::now();
        let findings = match scan_result {
            Ok(report) => {
                // Stage 4: one result document per finding.
                for finding in &report.findings {
                    let doc = result_document(&job, finding, &stamps);
                    self.ship(&doc, RESULT_INDEX).await;
                }
                self.advance(&mut job, ScanStatus::Complete);
                report.findings.len()
            }
            Err(err) => {
                error!(
                    image = %job.image_name,
                    scan_id = %job.scan_id,
                    error = %err,
                    "secret scan failed"
                );
                job.fail(err.to_string());
                0
            }
        };

        // Stage 5: terminal status, sharing the post-scan timestamps.
        self.emit_status(&job, &stamps).await;

        info!(
            image = %job.image_name,
            scan_id = %job.scan_id,
            status = %job.status(),
            findings,
            "scan job finished"
        );
        JobOutcome::from_job(&job, findings)
    }

    /// Standalone mode: acquire and scan inline, returning the report
    /// document instead of shipping it to the sink. Errors propagate to
    /// the caller since there is no asynchronous contract to preserve.
    pub async fn run_inline(&self, job: &ScanJob) -> Result<Value, ScanError> {
        let workdir = self.fetcher.fetch(job).await?;
        let report = self.engine.scan(&job.image_name, workdir.path()).await?;
        Ok(inline_report(job, &report, &DocTimestamps::now()))
    }

    /// Transitions are driven by the stage sequence above and cannot go
    /// backward; a refusal here is a pipeline bug, logged and ignored.
    fn advance(&self, job: &mut ScanJob, next: ScanStatus) {
        if let Err(err) = job.advance(next) {
            warn!(
                image = %job.image_name,
                scan_id = %job.scan_id,
                error = %err,
                "status transition refused"
            );
        }
    }

    async fn emit_status(&self, job: &ScanJob, stamps: &DocTimestamps) {
        let doc = status_document(job, stamps);
        self.ship(&doc, STATUS_INDEX).await;
    }

    /// Serialize and ingest a single document. Both failure modes are
    /// logged and swallowed: the document is dropped, the job carries on.
    async fn ship(&self, doc: &Value, index: &str) {
        let payload = match serde_json::to_string(doc) {
            Ok(payload) => payload,
            Err(err) => {
                error!(index, error = %err, "failed to encode document, dropping it");
                return;
            }
        };
        if let Err(err) = self.sink.ingest(&payload, index).await {
            error!(index, error = %err, "failed to ingest document");
        }
    }
}
