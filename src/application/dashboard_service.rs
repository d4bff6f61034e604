// Dashboard service - Fetches readings and builds page projections
use crate::application::reading_source::{FetchError, ReadingSource};
use crate::domain::dashboard::{Details, Overview};
use crate::domain::projection::RoomFilter;
use crate::domain::reading::Reading;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn ReadingSource>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn ReadingSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        let readings = self.source.fetch_readings().await.inspect_err(|e| {
            tracing::warn!("Error fetching readings from {}: {}", self.source.describe(), e);
        })?;

        tracing::debug!(
            "Fetched {} readings from {}",
            readings.len(),
            self.source.describe()
        );
        Ok(readings)
    }

    pub async fn overview(&self) -> Result<Overview, FetchError> {
        let readings = self.fetch_readings().await?;
        Ok(Overview::from_readings(&readings))
    }

    pub async fn details(&self, filter: RoomFilter) -> Result<Details, FetchError> {
        let readings = self.fetch_readings().await?;
        Ok(Details::from_readings(&readings, filter))
    }
}
