// Reading source backed by a local JSON document
use crate::application::reading_source::{FetchError, ReadingSource};
use crate::domain::reading::{decode_readings, Reading};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileReadingSource {
    path: PathBuf,
}

impl FileReadingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReadingSource for FileReadingSource {
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(decode_readings(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
