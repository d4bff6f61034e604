// Reading domain model
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One timestamped multi-sensor sample for a room.
///
/// Only `room`, `timestamp` and `aqi` are required. The remaining metrics are
/// read optimistically and may be absent in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub room: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub aqi: f64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub co2: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub tvoc: Option<f64>,
}

impl Reading {
    #[cfg(test)]
    pub fn new(room: impl Into<String>, timestamp: DateTime<Utc>, aqi: f64) -> Self {
        Self {
            room: room.into(),
            timestamp,
            aqi,
            temperature: None,
            co2: None,
            humidity: None,
            tvoc: None,
        }
    }

    pub fn time_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Decode a reading document record by record. Records that do not form a
/// reading are skipped with a warning so one bad sample cannot blank the page.
pub fn decode_readings(raw: &[u8]) -> Result<Vec<Reading>, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(raw)?;
    let total = records.len();

    let readings: Vec<Reading> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match serde_json::from_value(record) {
            Ok(reading) => Some(reading),
            Err(e) => {
                tracing::warn!("Skipping reading #{}: {}", idx, e);
                None
            }
        })
        .collect();

    if readings.len() < total {
        tracing::warn!("Decoded {} of {} readings", readings.len(), total);
    }
    Ok(readings)
}

/// Parse the timestamp formats sensors are known to emit.
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(time.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{}'", raw)))
}
