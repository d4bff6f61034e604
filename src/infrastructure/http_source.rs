// Reading source fetched over HTTP
use crate::application::reading_source::{FetchError, ReadingSource};
use crate::domain::reading::{decode_readings, Reading};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpReadingSource {
    url: String,
    client: reqwest::Client,
}

impl HttpReadingSource {
    /// `timeout` bounds the whole request, body included.
    pub fn new(url: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    fn transport_error(&self, source: reqwest::Error) -> FetchError {
        FetchError::Transport {
            url: self.url.clone(),
            source: Box::new(source),
        }
    }
}

#[async_trait]
impl ReadingSource for HttpReadingSource {
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body: Bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(decode_readings(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
