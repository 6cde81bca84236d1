//! Hand-rolled collaborator doubles shared by the unit tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use crate::error::ScanError;
use crate::external::{ArtifactFetcher, DocumentSink, SecretEngine};
use crate::types::{ScanJob, ScanReport};

/// Fetcher that hands out an empty temp dir without touching any registry.
pub struct TempFetcher;

#[async_trait]
impl ArtifactFetcher for TempFetcher {
    async fn fetch(&self, _job: &ScanJob) -> Result<TempDir, ScanError> {
        Ok(TempDir::new()?)
    }
}

/// Fetcher that always fails with the given message.
pub struct FailingFetcher {
    message: String,
}

impl FailingFetcher {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ArtifactFetcher for FailingFetcher {
    async fn fetch(&self, job: &ScanJob) -> Result<TempDir, ScanError> {
        Err(ScanError::Command {
            operation: format!("image save {}", job.image_name),
            message: self.message.clone(),
        })
    }
}

/// Engine that returns a fixed report for every image.
pub struct StaticEngine {
    report: ScanReport,
}

impl StaticEngine {
    pub fn new(report: ScanReport) -> Self {
        Self { report }
    }
}

#[async_trait]
impl SecretEngine for StaticEngine {
    async fn scan(&self, _image_name: &str, _dir: &Path) -> Result<ScanReport, ScanError> {
        Ok(self.report.clone())
    }
}

/// Engine that always fails with the given message.
pub struct FailingEngine {
    message: String,
}

impl FailingEngine {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl SecretEngine for FailingEngine {
    async fn scan(&self, image_name: &str, _dir: &Path) -> Result<ScanReport, ScanError> {
        Err(ScanError::Command {
            operation: format!("secret scan {image_name}"),
            message: self.message.clone(),
        })
    }
}

/// Engine that sleeps inside the scan stage while tracking how many scans
/// run at once, for asserting the pool's concurrency bound.
#[derive(Default)]
pub struct GaugeEngine {
    current: AtomicUsize,
    peak: AtomicUsize,
    delay_ms: u64,
}

impl GaugeEngine {
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretEngine for GaugeEngine {
    async fn scan(&self, _image_name: &str, _dir: &Path) -> Result<ScanReport, ScanError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(ScanReport::default())
    }
}

/// Sink that records every ingested document, optionally rejecting all of
/// them to exercise the log-and-continue policy.
#[derive(Default)]
pub struct RecordingSink {
    documents: Mutex<Vec<(String, Value)>>,
    reject: bool,
}

impl RecordingSink {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// All documents shipped to the given index, in arrival order.
    pub fn documents(&self, index: &str) -> Vec<Value> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| i == index)
            .map(|(_, doc)| doc.clone())
            .collect()
    }
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn ingest(&self, document: &str, index: &str) -> Result<(), ScanError> {
        let doc: Value = serde_json::from_str(document)?;
        self.documents
            .lock()
            .unwrap()
            .push((index.to_string(), doc));
        if self.reject {
            return Err(ScanError::Command {
                operation: "ingest".to_string(),
                message: "sink rejected document".to_string(),
            });
        }
        Ok(())
    }
}
