// Projections over a fetched reading set
use super::reading::Reading;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Room selection for the details page. `all` selects every room.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoomFilter {
    #[default]
    All,
    Room(String),
}

impl RoomFilter {
    pub const ALL: &'static str = "all";

    pub fn from_query(room: Option<&str>) -> Self {
        match room {
            None | Some("") | Some(Self::ALL) => RoomFilter::All,
            Some(room) => RoomFilter::Room(room.to_string()),
        }
    }

    pub fn matches(&self, reading: &Reading) -> bool {
        match self {
            RoomFilter::All => true,
            RoomFilter::Room(room) => reading.room == *room,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoomFilter::All => Self::ALL,
            RoomFilter::Room(room) => room,
        }
    }
}

impl fmt::Display for RoomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RoomFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Latest reading per room, in order of each room's first appearance.
///
/// When two readings of a room share a timestamp the one later in the input
/// wins.
pub fn latest_per_room(readings: &[Reading]) -> Vec<&Reading> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<&Reading> = Vec::new();

    for reading in readings {
        match slots.get(reading.room.as_str()) {
            Some(&idx) => {
                if reading.timestamp >= latest[idx].timestamp {
                    latest[idx] = reading;
                }
            }
            None => {
                slots.insert(reading.room.as_str(), latest.len());
                latest.push(reading);
            }
        }
    }

    latest
}

/// Distinct room names in order of first appearance.
pub fn distinct_rooms(readings: &[Reading]) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    readings
        .iter()
        .map(|r| r.room.as_str())
        .filter(|room| seen.insert(*room))
        .collect()
}

/// Readings matching `filter`, newest first. Equal timestamps keep input order.
pub fn newest_first<'a>(readings: &'a [Reading], filter: &RoomFilter) -> Vec<&'a Reading> {
    let mut selected: Vec<&Reading> = readings.iter().filter(|r| filter.matches(r)).collect();
    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    selected
}

/// Per-room readings in ascending time order, rooms in first-appearance order.
pub fn series_by_room(readings: &[Reading]) -> Vec<(&str, Vec<&Reading>)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<(&str, Vec<&Reading>)> = Vec::new();

    for reading in readings {
        let room = reading.room.as_str();
        let idx = *slots.entry(room).or_insert_with(|| {
            series.push((room, Vec::new()));
            series.len() - 1
        });
        series[idx].1.push(reading);
    }

    for (_, points) in &mut series {
        points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }
    series
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub fn reading(room: &str, minute: u32, aqi: f64) -> Reading {
        let mut reading = Reading::new(room, Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0).unwrap(), aqi);
        reading.temperature = Some(20.0 + f64::from(minute) / 10.0);
        reading.co2 = Some(400.0 + f64::from(minute));
        reading.humidity = Some(40.0);
        reading.tvoc = Some(100.0);
        reading
    }
}
