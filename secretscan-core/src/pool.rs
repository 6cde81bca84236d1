//! Bounded-concurrency job execution.
//!
//! A fixed set of worker tasks drains one bounded queue, so at most
//! `workers` pipelines ever run at once and excess submissions park on
//! the queue instead of spawning unbounded work. There is no
//! cancellation, priority, or timeout; a stuck pipeline occupies its
//! worker until it returns.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, error};

use crate::error::ScanError;
use crate::pipeline::JobPipeline;
use crate::types::{JobOutcome, ScanJob};

/// Queue slots per worker. Caps how many submissions can park at once
/// without making the queue a second source of unboundedness.
const QUEUE_DEPTH_PER_WORKER: usize = 4;

struct QueuedJob {
    job: ScanJob,
    done: oneshot::Sender<JobOutcome>,
}

/// Fixed-width worker pool. Created once at startup and handed to the
/// components that need it; concurrency is fixed for the process
/// lifetime.
pub struct WorkerPool {
    queue: mpsc::Sender<QueuedJob>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(pipeline: Arc<JobPipeline>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (tx, rx) = mpsc::channel::<QueuedJob>(workers * QUEUE_DEPTH_PER_WORKER);
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..workers {
            let rx = Arc::clone(&rx);
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                loop {
                    // Hold the lock only for the receive; the pipeline
                    // must not serialize across workers.
                    let queued = { rx.lock().await.recv().await };
                    let Some(QueuedJob { job, done }) = queued else {
                        debug!(worker, "job queue closed, worker exiting");
                        break;
                    };
                    let outcome = pipeline.run(job).await;
                    // The submitter may have given up on the notification;
                    // the job itself already ran to completion.
                    let _ = done.send(outcome);
                }
            });
        }

        Self { queue: tx, workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Submit one job and wait for its pipeline to finish. Blocks while
    /// the queue is full, which is the pool's backpressure mechanism.
    pub async fn submit(&self, job: ScanJob) -> Result<JobOutcome, ScanError> {
        let (done_tx, done_rx) = oneshot::channel();
        let queued = QueuedJob {
            job,
            done: done_tx,
        };
        if self.queue.send(queued).await.is_err() {
            error!("job queue receiver dropped");
            return Err(ScanError::PoolClosed);
        }
        done_rx.await.map_err(|_| ScanError::PoolClosed)
    }
}
