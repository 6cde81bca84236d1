use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BatchError, ScanError};

/// Caller-supplied scalar parameters carried verbatim into every document
/// a job emits, in the order they arrived.
pub type ContextFields = Vec<(String, String)>;

/// Lifecycle state of a scan job.
///
/// Transitions only move forward: `Queued -> InProgress -> {Complete, Error}`.
/// A terminal state is final. A job that fails before scanning starts may
/// skip straight from `Queued` to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Queued,
    InProgress,
    Complete,
    Error,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Queued => "QUEUED",
            ScanStatus::InProgress => "IN_PROGRESS",
            ScanStatus::Complete => "COMPLETE",
            ScanStatus::Error => "ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Complete | ScanStatus::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            ScanStatus::Queued => 0,
            ScanStatus::InProgress => 1,
            ScanStatus::Complete | ScanStatus::Error => 2,
        }
    }

    pub fn can_advance_to(&self, next: ScanStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of scan work: a single image paired with its caller-supplied
/// correlation id and the batch's scalar passthrough fields.
///
/// A job is owned by exactly one worker while it executes; status is only
/// mutated through [`ScanJob::advance`] and [`ScanJob::fail`].
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub image_name: String,
    pub scan_id: String,
    pub context: ContextFields,
    status: ScanStatus,
    error_message: Option<String>,
}

impl ScanJob {
    pub fn new(
        image_name: impl Into<String>,
        scan_id: impl Into<String>,
        context: ContextFields,
    ) -> Self {
        Self {
            image_name: image_name.into(),
            scan_id: scan_id.into(),
            context,
            status: ScanStatus::Queued,
            error_message: None,
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Look up a single passthrough field by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Move the job forward to `next`, rejecting backward or
    /// out-of-terminal transitions.
    pub fn advance(&mut self, next: ScanStatus) -> Result<(), ScanError> {
        if !self.status.can_advance_to(next) {
            return Err(ScanError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Terminate the job in error with the given message.
    ///
    /// Infallible: `Error` is reachable from every non-terminal state, and
    /// failing an already-failed job keeps the first message.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status.can_advance_to(ScanStatus::Error) {
            self.status = ScanStatus::Error;
            self.error_message = Some(message.into());
        }
    }
}

/// A validated batch submission: parallel image/scan-id sequences plus the
/// shared passthrough fields.
#[derive(Debug, Clone)]
pub struct ScanBatch {
    images: Vec<String>,
    scan_ids: Vec<String>,
    context: ContextFields,
}

impl ScanBatch {
    /// Validate the parallel sequences before any job is created: the image
    /// list must be non-empty and both lists must have equal length.
    pub fn new(
        images: Vec<String>,
        scan_ids: Vec<String>,
        context: ContextFields,
    ) -> Result<Self, BatchError> {
        if images.is_empty() {
            return Err(BatchError::MissingImageList);
        }
        if images.len() != scan_ids.len() {
            return Err(BatchError::LengthMismatch {
                images: images.len(),
                scan_ids: scan_ids.len(),
            });
        }
        Ok(Self {
            images,
            scan_ids,
            context,
        })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Fan the batch out into independent jobs, each carrying its own copy
    /// of the passthrough fields.
    pub fn into_jobs(self) -> Vec<ScanJob> {
        self.images
            .into_iter()
            .zip(self.scan_ids)
            .map(|(image, scan_id)| ScanJob::new(image, scan_id, self.context.clone()))
            .collect()
    }
}

/// One detected secret, as reported by the scan engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: u32,
    pub rule_name: String,
    /// Which part of the file matched: filename, extension, or contents.
    pub part: String,
    pub matched_content: String,
    pub severity: String,
    pub severity_score: f64,
    pub full_filename: String,
}

impl Finding {
    /// The statically declared set of fields a finding contributes to a
    /// result document. Adding a field to the struct means adding it here;
    /// nothing is copied by introspection.
    pub fn document_fields(&self) -> [(&'static str, Value); 7] {
        [
            ("rule_id", Value::from(self.rule_id)),
            ("rule_name", Value::from(self.rule_name.clone())),
            ("part", Value::from(self.part.clone())),
            ("matched_content", Value::from(self.matched_content.clone())),
            ("severity", Value::from(self.severity.clone())),
            ("severity_score", Value::from(self.severity_score)),
            ("full_filename", Value::from(self.full_filename.clone())),
        ]
    }
}

/// Output of the scan stage for one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

/// Completion notification for one job, delivered to the submitter once the
/// pipeline finishes. The network boundary ignores it (fire-and-forget);
/// tests and future callers can observe it.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub image_name: String,
    pub scan_id: String,
    pub status: ScanStatus,
    pub findings: usize,
    pub error: Option<String>,
}

impl JobOutcome {
    pub(crate) fn from_job(job: &ScanJob, findings: usize) -> Self {
        Self {
            image_name: job.image_name.clone(),
            scan_id: job.scan_id.clone(),
            status: job.status(),
            findings,
            error: job.error_message().map(str::to_owned),
        }
    }
}
