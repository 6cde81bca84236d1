//! Job orchestration for container secret scanning.
//!
//! A batch of (image, scan id) pairs fans out into independent jobs, each
//! driven through acquire -> scan -> publish on a bounded worker pool.
//! Progress is observable only through the status and result documents
//! delivered to the ingestion sink; the external collaborators (registry
//! export, detection engine, sink) live behind trait seams in
//! [`external`].

pub mod dispatch;
pub mod documents;
pub mod error;
pub mod external;
pub mod pipeline;
pub mod pool;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::dispatch_batch;
pub use documents::{DocTimestamps, RESULT_INDEX, STATUS_INDEX};
pub use error::{BatchError, ScanError};
pub use external::{
    ArtifactFetcher, CommandEngine, CommandFetcher, ConsoleSink, DocumentSink, SecretEngine,
};
pub use pipeline::JobPipeline;
pub use pool::WorkerPool;
pub use types::{ContextFields, Finding, JobOutcome, ScanBatch, ScanJob, ScanReport, ScanStatus};
