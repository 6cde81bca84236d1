use thiserror::Error;

use crate::types::ScanStatus;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ingestion error: {0}")]
    Ingestion(#[from] reqwest::Error),

    #[error("{operation}: {message}")]
    Command { operation: String, message: String },

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ScanStatus, to: ScanStatus },

    #[error("worker pool is shut down")]
    PoolClosed,
}

/// Batch validation failures, surfaced to the caller before any job exists.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("Image name with tag list is required")]
    MissingImageList,

    #[error("image list and scan id list differ in length: {images} images, {scan_ids} scan ids")]
    LengthMismatch { images: usize, scan_ids: usize },
}

pub type Result<T> = std::result::Result<T, ScanError>;
