use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::error::ScanError;

use super::traits::DocumentSink;

/// HTTP client for the management console's ingestion endpoint. Documents
/// are POSTed one at a time to `<base>/ingest/<index>`.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ConsoleSink {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl DocumentSink for ConsoleSink {
    async fn ingest(&self, document: &str, index: &str) -> Result<(), ScanError> {
        let url = format!("{}/ingest/{}", self.base_url.trim_end_matches('/'), index);
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .body(document.to_owned())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
