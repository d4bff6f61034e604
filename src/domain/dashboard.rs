// Dashboard domain models
use super::projection::{distinct_rooms, latest_per_room, newest_first, series_by_room, RoomFilter};
use super::reading::Reading;
use super::severity::Severity;
use super::telemetry::{Metric, SeriesData};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One room's latest reading as shown on the overview gauges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub room: String,
    pub timestamp: DateTime<Utc>,
    pub aqi: f64,
    pub temperature: Option<f64>,
    pub severity: Severity,
}

impl Gauge {
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            room: reading.room.clone(),
            timestamp: reading.timestamp,
            aqi: reading.aqi,
            temperature: reading.temperature,
            severity: Severity::from_aqi(reading.aqi),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub gauges: Vec<Gauge>,
    /// AQI over time, one series per room.
    pub series: Vec<SeriesData>,
}

impl Overview {
    pub fn from_readings(readings: &[Reading]) -> Self {
        let gauges = latest_per_room(readings)
            .into_iter()
            .map(Gauge::from_reading)
            .collect();

        let series = series_by_room(readings)
            .into_iter()
            .map(|(room, points)| {
                SeriesData::from_readings(room.to_string(), format!("{} AQI", room), Metric::Aqi, &points)
            })
            .collect();

        Self { gauges, series }
    }
}

pub const DETAIL_METRICS: [Metric; 3] = [Metric::Aqi, Metric::Temperature, Metric::Co2];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Details {
    pub filter: RoomFilter,
    pub rooms: Vec<String>,
    /// Matching readings, newest first.
    pub rows: Vec<Reading>,
    /// One ascending series per entry of [`DETAIL_METRICS`].
    pub series: Vec<SeriesData>,
}

impl Details {
    pub fn from_readings(readings: &[Reading], filter: RoomFilter) -> Self {
        let rooms = distinct_rooms(readings).into_iter().map(str::to_string).collect();
        let newest = newest_first(readings, &filter);

        let ascending: Vec<&Reading> = {
            let mut points = newest.clone();
            points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
            points
        };
        let series = DETAIL_METRICS
            .iter()
            .map(|metric| {
                SeriesData::from_readings(
                    metric.id().to_string(),
                    metric.label().to_string(),
                    *metric,
                    &ascending,
                )
            })
            .collect();

        Self {
            filter,
            rooms,
            rows: newest.into_iter().cloned().collect(),
            series,
        }
    }

    pub fn title(&self) -> String {
        match &self.filter {
            RoomFilter::All => "All Rooms Data".to_string(),
            RoomFilter::Room(room) => format!("{} Data", room),
        }
    }
}
