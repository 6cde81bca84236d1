//! Process-backed implementations of the acquisition and scan seams.
//!
//! Both collaborators are external programs in production: a registry
//! save helper that exports an image to a directory, and a scanner binary
//! that emits a JSON report on stdout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use crate::error::ScanError;
use crate::types::{ScanJob, ScanReport};

use super::traits::{ArtifactFetcher, SecretEngine};

/// Runs a configured save command to export an image into a fresh
/// working directory under `tmp_root`.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    command: String,
    tmp_root: PathBuf,
}

impl CommandFetcher {
    pub fn new(command: impl Into<String>, tmp_root: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            tmp_root: tmp_root.into(),
        }
    }
}

#[async_trait]
impl ArtifactFetcher for CommandFetcher {
    async fn fetch(&self, job: &ScanJob) -> Result<TempDir, ScanError> {
        tokio::fs::create_dir_all(&self.tmp_root).await?;
        let dir = tempfile::Builder::new()
            .prefix("secret-scan-")
            .tempdir_in(&self.tmp_root)?;

        let mut cmd = Command::new(&self.command);
        cmd.arg("--image-name-with-tag")
            .arg(&job.image_name)
            .arg("--output-dir")
            .arg(dir.path());
        if let Some(registry_type) = job.context_value("registry_type") {
            cmd.arg("--registry-type").arg(registry_type);
        }
        if let Some(credential_id) = job.context_value("credential_id") {
            cmd.arg("--credential-id").arg(credential_id);
        }

        let out = run_checked(cmd, format!("image save {}", job.image_name)).await?;
        debug!(
            image = %job.image_name,
            bytes = out.len(),
            "image save command finished"
        );
        Ok(dir)
    }
}

/// Runs a configured scanner command against an exported image directory
/// and parses the JSON report it prints to stdout.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: String,
}

impl CommandEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl SecretEngine for CommandEngine {
    async fn scan(&self, image_name: &str, dir: &Path) -> Result<ScanReport, ScanError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg("--image-name")
            .arg(image_name)
            .arg("--local")
            .arg(dir)
            .arg("--json");

        let stdout = run_checked(cmd, format!("secret scan {image_name}")).await?;
        let report = serde_json::from_slice(&stdout)?;
        Ok(report)
    }
}

/// Run a command to completion, capturing output. A non-zero exit folds
/// stderr into the error message so the failure reason survives into
/// status documents.
async fn run_checked(mut cmd: Command, operation: String) -> Result<Vec<u8>, ScanError> {
    let output = cmd.output().await?;
    if !output.status.success() {
        return Err(ScanError::Command {
            operation,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}
