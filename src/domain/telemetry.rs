// Time series domain models
use super::reading::Reading;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: Option<f64>) -> Self {
        Self { time_ms, value }
    }
}

/// Metrics that can be charted from a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Aqi,
    Temperature,
    Co2,
}

impl Metric {
    pub fn value(&self, reading: &Reading) -> Option<f64> {
        match self {
            Metric::Aqi => Some(reading.aqi),
            Metric::Temperature => reading.temperature,
            Metric::Co2 => reading.co2,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Metric::Aqi => "aqi",
            Metric::Temperature => "temperature",
            Metric::Co2 => "co2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Aqi => "AQI",
            Metric::Temperature => "Temperature (°C)",
            Metric::Co2 => "CO₂ (ppm)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, points: Vec<TimeSeriesPoint>) -> Self {
        Self { id, name, points }
    }

    /// Build a series of `metric` from readings already in time order.
    pub fn from_readings(id: String, name: String, metric: Metric, readings: &[&Reading]) -> Self {
        let points = readings
            .iter()
            .map(|r| TimeSeriesPoint::new(r.time_ms(), metric.value(r)))
            .collect();
        Self::new(id, name, points)
    }
}
