use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::error::ScanError;
use crate::types::{ScanJob, ScanReport};

/// Materializes the artifact to scan into a local working directory.
///
/// The returned directory is owned by the job for the remainder of its
/// pipeline and is removed when dropped.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, job: &ScanJob) -> Result<TempDir, ScanError>;
}

/// The actual secret-detection step. Detection rules live entirely behind
/// this seam.
#[async_trait]
pub trait SecretEngine: Send + Sync {
    async fn scan(&self, image_name: &str, dir: &Path) -> Result<ScanReport, ScanError>;
}

/// Receives serialized status and result documents, addressed by logical
/// index name.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn ingest(&self, document: &str, index: &str) -> Result<(), ScanError>;
}
