use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Worker pool width, fixed for the process lifetime
    pub scan_concurrency: usize,

    // Ingestion sink settings
    pub console_url: String,
    pub console_api_key: String,

    // External collaborator commands
    pub image_save_command: String,
    pub scanner_command: String,

    // Root for per-job working directories
    pub scan_tmp_dir: PathBuf,
}

pub const DEFAULT_SCAN_CONCURRENCY: usize = 2;

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8011".to_string())
                .parse()
                .unwrap_or(8011),

            scan_concurrency: parse_concurrency(env::var("SECRET_SCAN_CONCURRENCY").ok()),

            console_url: env::var("CONSOLE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            console_api_key: env::var("CONSOLE_API_KEY").unwrap_or_default(),

            image_save_command: env::var("IMAGE_SAVE_COMMAND")
                .unwrap_or_else(|_| "registry-image-save".to_string()),
            scanner_command: env::var("SCANNER_COMMAND")
                .unwrap_or_else(|_| "secret-scanner".to_string()),

            scan_tmp_dir: env::var("SCAN_TMP_DIR")
                .unwrap_or_else(|_| "/tmp/secret-scan".to_string())
                .into(),
        })
    }
}

/// Pool width from the environment: unset or unparsable falls back to the
/// default of 2.
fn parse_concurrency(raw: Option<String>) -> usize {
    raw.and_then(|value| value.trim().parse().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(DEFAULT_SCAN_CONCURRENCY)
}
