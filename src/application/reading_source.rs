// Source trait for reading data access
use crate::domain::reading::Reading;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed reading data: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Fetch the complete reading set. Every call replaces the previous set.
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;
}
