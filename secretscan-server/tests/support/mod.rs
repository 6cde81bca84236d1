//! Shared fixtures: collaborator doubles and a state builder for
//! HTTP-level tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use secretscan_core::{
    ArtifactFetcher, DocumentSink, JobPipeline, ScanError, ScanJob, ScanReport, SecretEngine,
    WorkerPool,
};
use secretscan_server::{AppState, Config};

/// Sink that records every document so tests can observe job progress the
/// same way external consumers do.
#[derive(Default)]
pub struct RecordingSink {
    documents: Mutex<Vec<(String, Value)>>,
}

impl RecordingSink {
    pub fn documents(&self, index: &str) -> Vec<Value> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| i == index)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().unwrap().is_empty()
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
        Ok(())
    }
}

pub struct TempFetcher;

#[async_trait]
impl ArtifactFetcher for TempFetcher {
    async fn fetch(&self, _job: &ScanJob) -> Result<TempDir, ScanError> {
        Ok(TempDir::new()?)
    }
}

pub struct FailingFetcher {
    pub message: String,
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

pub struct StaticEngine {
    pub report: ScanReport,
}

#[async_trait]
impl SecretEngine for StaticEngine {
    async fn scan(&self, _image_name: &str, _dir: &Path) -> Result<ScanReport, ScanError> {
        Ok(self.report.clone())
    }
}

pub fn test_config(workers: usize) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        scan_concurrency: workers,
        console_url: "http://localhost:0".to_string(),
        console_api_key: String::new(),
        image_save_command: "true".to_string(),
        scanner_command: "true".to_string(),
        scan_tmp_dir: PathBuf::from("/tmp/secret-scan-test"),
    }
}

/// Application state wired with doubles instead of external commands.
pub fn test_state(
    fetcher: Arc<dyn ArtifactFetcher>,
    engine: Arc<dyn SecretEngine>,
    workers: usize,
) -> (AppState, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let pipeline = Arc::new(JobPipeline::new(fetcher, engine, sink.clone()));
    let pool = Arc::new(WorkerPool::new(Arc::clone(&pipeline), workers));
    let state = AppState::new(Arc::new(test_config(workers)), pipeline, pool);
    (state, sink)
}
