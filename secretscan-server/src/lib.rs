//! HTTP intake for container secret scans.
//!
//! Two mutually exclusive serving modes share one binary: batch mode
//! acknowledges a form-encoded batch immediately and fans it out over the
//! bounded worker pool, while standalone mode scans a single image inline
//! and returns the report synchronously.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use state::AppState;
