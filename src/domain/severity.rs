// AQI severity scale
use serde::Serialize;

/// Colors for levels 1 through 5: green, yellow, orange, red, purple.
const LEVEL_COLORS: [&str; 5] = ["#4caf50", "#ffeb3b", "#ff9800", "#f44336", "#9c27b0"];

/// Color used for a level outside 1..=5.
pub const FALLBACK_COLOR: &str = "#bdbdbd";

/// Map an AQI value onto the 1..=5 severity scale.
pub fn aqi_level(aqi: f64) -> u8 {
    if aqi <= 50.0 {
        1
    } else if aqi <= 100.0 {
        2
    } else if aqi <= 150.0 {
        3
    } else if aqi <= 200.0 {
        4
    } else {
        5
    }
}

pub fn level_color(level: u8) -> &'static str {
    usize::from(level)
        .checked_sub(1)
        .and_then(|idx| LEVEL_COLORS.get(idx))
        .copied()
        .unwrap_or(FALLBACK_COLOR)
}

/// Gauge needle angle in degrees, 45 per level above the first.
pub fn needle_rotation(level: u8) -> i32 {
    (i32::from(level) - 1) * 45
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Severity {
    pub level: u8,
    pub color: &'static str,
}

impl Severity {
    pub fn from_aqi(aqi: f64) -> Self {
        let level = aqi_level(aqi);
        Self {
            level,
            color: level_color(level),
        }
    }

    pub fn rotation(&self) -> i32 {
        needle_rotation(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(aqi_level(0.0), 1);
        assert_eq!(aqi_level(50.0), 1);
        assert_eq!(aqi_level(50.5), 2);
        assert_eq!(aqi_level(100.0), 2);
        assert_eq!(aqi_level(101.0), 3);
        assert_eq!(aqi_level(150.0), 3);
        assert_eq!(aqi_level(200.0), 4);
        assert_eq!(aqi_level(200.1), 5);
        assert_eq!(aqi_level(999.0), 5);
        assert_eq!(aqi_level(-20.0), 1);
    }

    #[test]
    fn test_level_is_monotonic_and_bounded() {
        let mut previous = 0;
        for step in -100..=600 {
            let level = aqi_level(step as f64 * 0.5);
            assert!((1..=5).contains(&level));
            assert!(level >= previous, "level dropped at aqi {}", step as f64 * 0.5);
            previous = level;
        }
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(level_color(1), "#4caf50");
        assert_eq!(level_color(2), "#ffeb3b");
        assert_eq!(level_color(3), "#ff9800");
        assert_eq!(level_color(4), "#f44336");
        assert_eq!(level_color(5), "#9c27b0");
        assert_eq!(level_color(0), FALLBACK_COLOR);
        assert_eq!(level_color(6), FALLBACK_COLOR);
    }

    #[test]
    fn test_severity_from_aqi() {
        let severity = Severity::from_aqi(90.0);
        assert_eq!(severity.level, 2);
        assert_eq!(severity.color, "#ffeb3b");
        assert_eq!(severity.rotation(), 45);
        assert_eq!(Severity::from_aqi(250.0).rotation(), 180);
    }
}
