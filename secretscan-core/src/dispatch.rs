//! Batch fan-out: one submission task per job.
//!
//! Each job gets its own task so a full queue for one submission never
//! delays handing the others to the pool. The pool's bounded queue, not
//! this module, limits how much work is in flight.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::pool::WorkerPool;
use crate::types::ScanBatch;

/// Fan a validated batch into independent pool submissions and wait for
/// all of them to finish. Callers that want fire-and-forget semantics
/// spawn this onto its own task; nothing is reported back here beyond
/// logs.
pub async fn dispatch_batch(pool: Arc<WorkerPool>, batch: ScanBatch) {
    let jobs = batch.into_jobs();
    info!(jobs = jobs.len(), "dispatching scan batch");

    let mut handles = Vec::with_capacity(jobs.len());
    for job in jobs {
        let pool = Arc::clone(&pool);
        handles.push(tokio::spawn(async move {
            let image = job.image_name.clone();
            let scan_id = job.scan_id.clone();
            match pool.submit(job).await {
                Ok(outcome) => debug!(
                    image = %outcome.image_name,
                    scan_id = %outcome.scan_id,
                    status = %outcome.status,
                    findings = outcome.findings,
                    "job finished"
                ),
                Err(err) => error!(
                    image = %image,
                    scan_id = %scan_id,
                    error = %err,
                    "job submission failed"
                ),
            }
        }));
    }

    for handle in handles {
        if let Err(err) = handle.await {
            error!(error = %err, "submission task panicked");
        }
    }
}
