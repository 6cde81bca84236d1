use std::fmt;
use std::sync::Arc;

use secretscan_core::{CommandEngine, CommandFetcher, ConsoleSink, JobPipeline, WorkerPool};

use crate::config::Config;

/// Shared application state: the configuration, the process-wide worker
/// pool, and the pipeline (used directly in standalone mode, and by the
/// pool's workers in batch mode). All constructed once at startup; there
/// are no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<JobPipeline>,
    pub pool: Arc<WorkerPool>,
}

impl AppState {
    pub fn new(config: Arc<Config>, pipeline: Arc<JobPipeline>, pool: Arc<WorkerPool>) -> Self {
        Self {
            config,
            pipeline,
            pool,
        }
    }

    /// Wire the production collaborators: registry save command, scanner
    /// command, and the console ingestion endpoint.
    pub fn production(config: Arc<Config>) -> Self {
        let pipeline = Arc::new(JobPipeline::new(
            Arc::new(CommandFetcher::new(
                config.image_save_command.as_str(),
                config.scan_tmp_dir.clone(),
            )),
            Arc::new(CommandEngine::new(config.scanner_command.as_str())),
            Arc::new(ConsoleSink::new(
                config.console_url.as_str(),
                config.console_api_key.as_str(),
            )),
        ));
        let pool = Arc::new(WorkerPool::new(
            Arc::clone(&pipeline),
            config.scan_concurrency,
        ));
        Self::new(config, pipeline, pool)
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("workers", &self.pool.workers())
            .finish_non_exhaustive()
    }
}
