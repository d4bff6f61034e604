// Chart.js widget configurations
use crate::domain::dashboard::{Details, Overview};
use crate::domain::telemetry::SeriesData;
use serde_json::{json, Value};

struct Palette {
    border: &'static str,
    background: &'static str,
    axis: &'static str,
}

const DETAIL_PALETTE: [Palette; 3] = [
    Palette {
        border: "#3f51b5",
        background: "rgba(63, 81, 181, 0.1)",
        axis: "y",
    },
    Palette {
        border: "#ff9800",
        background: "rgba(255, 152, 0, 0.1)",
        axis: "y1",
    },
    Palette {
        border: "#4caf50",
        background: "rgba(76, 175, 80, 0.1)",
        axis: "y2",
    },
];

fn points(series: &SeriesData) -> Vec<Value> {
    series
        .points
        .iter()
        .map(|p| json!({ "x": p.time_ms, "y": p.value }))
        .collect()
}

fn time_axis() -> Value {
    json!({
        "type": "time",
        "time": {
            "unit": "hour",
            "displayFormats": { "hour": "HH:mm" }
        },
        "title": { "display": true, "text": "Time" },
        "grid": { "display": false }
    })
}

fn legend() -> Value {
    json!({
        "position": "top",
        "labels": { "boxWidth": 12, "padding": 20, "usePointStyle": true }
    })
}

fn animation() -> Value {
    json!({ "duration": 1000, "easing": "easeOutQuart" })
}

/// Hue for the `index`-th of `count` rooms, spread evenly around the wheel.
fn room_hue(index: usize, count: usize) -> f64 {
    index as f64 * (360.0 / count as f64)
}

/// AQI over time for every room.
pub fn overview_chart(overview: &Overview) -> Value {
    let count = overview.series.len();
    let datasets: Vec<Value> = overview
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let hue = room_hue(i, count);
            json!({
                "label": series.name,
                "data": points(series),
                "borderColor": format!("hsl({}, 70%, 50%)", hue),
                "backgroundColor": format!("hsla({}, 70%, 50%, 0.1)", hue),
                "borderWidth": 2,
                "tension": 0.3,
                "fill": true,
                "pointRadius": 0
            })
        })
        .collect();

    json!({
        "type": "line",
        "data": { "datasets": datasets },
        "options": {
            "responsive": true,
            "maintainAspectRatio": true,
            "interaction": { "mode": "index", "intersect": false },
            "scales": {
                "x": time_axis(),
                "y": {
                    "title": { "display": true, "text": "AQI" },
                    "min": 0,
                    "grid": { "color": "rgba(0, 0, 0, 0.05)" }
                }
            },
            "plugins": {
                "tooltip": { "valueSuffix": " AQI" },
                "legend": legend()
            },
            "animation": animation()
        }
    })
}

/// AQI, temperature and CO2 for the selected rooms on separate Y axes.
pub fn details_chart(details: &Details) -> Value {
    let datasets: Vec<Value> = details
        .series
        .iter()
        .zip(DETAIL_PALETTE.iter())
        .map(|(series, palette)| {
            json!({
                "label": series.name,
                "data": points(series),
                "borderColor": palette.border,
                "backgroundColor": palette.background,
                "borderWidth": 2,
                "tension": 0.3,
                "yAxisID": palette.axis
            })
        })
        .collect();

    json!({
        "type": "line",
        "data": { "datasets": datasets },
        "options": {
            "responsive": true,
            "maintainAspectRatio": true,
            "interaction": { "mode": "index", "intersect": false },
            "scales": {
                "x": time_axis(),
                "y": {
                    "type": "linear",
                    "display": true,
                    "position": "left",
                    "title": { "display": true, "text": "AQI" },
                    "grid": { "drawOnChartArea": false }
                },
                "y1": {
                    "type": "linear",
                    "display": true,
                    "position": "right",
                    "title": { "display": true, "text": "Temperature (°C)" },
                    "grid": { "drawOnChartArea": false }
                },
                "y2": {
                    "type": "linear",
                    "display": false,
                    "position": "right",
                    "title": { "display": true, "text": "CO₂ (ppm)" }
                }
            },
            "plugins": {
                "title": {
                    "display": true,
                    "text": details.title(),
                    "font": { "size": 16 }
                },
                "tooltip": { "valueSuffix": "" },
                "legend": legend()
            },
            "animation": animation()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::fixtures::reading;
    use crate::domain::projection::RoomFilter;

    #[test]
    fn test_overview_chart_one_dataset_per_room() {
        let readings = vec![
            reading("Kitchen", 1, 40.0),
            reading("Hall", 2, 10.0),
            reading("Attic", 3, 70.0),
            reading("Kitchen", 4, 90.0),
        ];
        let chart = overview_chart(&Overview::from_readings(&readings));

        let datasets = chart["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 3);
        assert_eq!(datasets[0]["label"], "Kitchen AQI");
        assert_eq!(datasets[0]["borderColor"], "hsl(0, 70%, 50%)");
        assert_eq!(datasets[1]["borderColor"], "hsl(120, 70%, 50%)");
        assert_eq!(datasets[2]["backgroundColor"], "hsla(240, 70%, 50%, 0.1)");
        assert_eq!(datasets[0]["data"].as_array().unwrap().len(), 2);
        assert_eq!(datasets[0]["data"][1]["y"], 90.0);
        assert_eq!(chart["options"]["scales"]["y"]["min"], 0);
    }

    #[test]
    fn test_details_chart_axes() {
        let readings = vec![reading("Kitchen", 1, 40.0), reading("Kitchen", 2, 90.0)];
        let details = Details::from_readings(&readings, RoomFilter::Room("Kitchen".to_string()));
        let chart = details_chart(&details);

        let datasets = chart["data"]["datasets"].as_array().unwrap();
        let axes: Vec<&str> = datasets.iter().map(|d| d["yAxisID"].as_str().unwrap()).collect();
        assert_eq!(axes, vec!["y", "y1", "y2"]);
        assert_eq!(datasets[2]["label"], "CO₂ (ppm)");
        assert_eq!(chart["options"]["plugins"]["title"]["text"], "Kitchen Data");
        assert_eq!(chart["options"]["scales"]["y2"]["display"], false);
    }

    #[test]
    fn test_missing_metric_is_null_point() {
        let mut sparse = reading("Hall", 1, 10.0);
        sparse.co2 = None;
        let details = Details::from_readings(&[sparse], RoomFilter::All);
        let chart = details_chart(&details);

        assert!(chart["data"]["datasets"][2]["data"][0]["y"].is_null());
    }
}
