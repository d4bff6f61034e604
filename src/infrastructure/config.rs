use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub source: SourceSettings,
    pub refresh: RefreshSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    /// Remote JSON document. Takes precedence over `path` when set.
    pub url: Option<String>,
    pub path: String,
    pub timeout_secs: u64,
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    pub interval_secs: u64,
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DisplaySettings {
    /// chrono format string for table timestamps (rendered in UTC)
    pub time_format: String,
    pub chart_js_url: String,
    pub chart_adapter_url: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            chart_js_url: DEFAULT_CHART_JS_URL.to_string(),
            chart_adapter_url: DEFAULT_CHART_ADAPTER_URL.to_string(),
        }
    }
}

const DEFAULT_TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
const DEFAULT_CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";
const DEFAULT_CHART_ADAPTER_URL: &str =
    "https://cdn.jsdelivr.net/npm/chartjs-adapter-date-fns@3/dist/chartjs-adapter-date-fns.bundle.min.js";

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from("config/dashboard")
}

/// Defaults, overlaid by the optional file `name` (any format the config
/// crate recognises) and then by `DASHBOARD__SECTION__KEY` variables.
pub fn load_settings_from(name: &str) -> anyhow::Result<Settings> {
    load_layered(name, dashboard_environment())
}

fn dashboard_environment() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_layered(name: &str, environment: config::Environment) -> anyhow::Result<Settings> {
    let settings: Settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("source.path", "testi.json")?
        .set_default("source.timeout_secs", 10)?
        .set_default("refresh.interval_secs", 30)?
        .set_default("display.time_format", DEFAULT_TIME_FORMAT)?
        .set_default("display.chart_js_url", DEFAULT_CHART_JS_URL)?
        .set_default("display.chart_adapter_url", DEFAULT_CHART_ADAPTER_URL)?
        .add_source(config::File::with_name(name).required(false))
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    validate_time_format(&settings.display.time_format)?;
    Ok(settings)
}

/// Reject strftime strings chrono cannot render; formatting them fails at
/// render time otherwise.
fn validate_time_format(format: &str) -> anyhow::Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("display.time_format '{}' is not a valid strftime format", format);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let settings = load_settings_from("config/does-not-exist").unwrap();

        assert_eq!(settings.server.bind, "0.0.0.0:8080");
        assert_eq!(settings.source.path, "testi.json");
        assert_eq!(settings.source.url, None);
        assert_eq!(settings.source.timeout(), Duration::from_secs(10));
        assert_eq!(settings.refresh.interval(), Duration::from_secs(30));
        assert_eq!(settings.display, DisplaySettings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let (dir, name) = write_config(
            "file-overlay",
            "[source]\nurl = \"http://sensors.local/readings.json\"\n\n[refresh]\ninterval_secs = 5\n",
        );
        let settings = load_settings_from(&name).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(settings.source.url.as_deref(), Some("http://sensors.local/readings.json"));
        assert_eq!(settings.source.path, "testi.json");
        assert_eq!(settings.refresh.interval_secs, 5);
    }

    #[test]
    fn test_interval_never_zero() {
        let refresh = RefreshSettings { interval_secs: 0 };
        assert_eq!(refresh.interval(), Duration::from_secs(1));
    }

    fn write_config(tag: &str, contents: &str) -> (std::path::PathBuf, String) {
        let dir = std::env::temp_dir().join(format!("aq-dashboard-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("dashboard.toml"), contents).unwrap();
        let name = dir.join("dashboard").to_str().unwrap().to_string();
        (dir, name)
    }

    #[test]
    fn test_invalid_time_format_is_rejected() {
        let (dir, name) = write_config("bad-format", "[display]\ntime_format = \"%Y-%Q\"\n");
        let result = load_settings_from(&name);
        std::fs::remove_dir_all(&dir).ok();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("%Y-%Q"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let (dir, name) = write_config(
            "env-overlay",
            "[refresh]\ninterval_secs = 5\n\n[source]\npath = \"from-file.json\"\n",
        );

        let mut vars = config::Map::new();
        vars.insert("DASHBOARD__REFRESH__INTERVAL_SECS".to_string(), "12".to_string());
        vars.insert(
            "DASHBOARD__SOURCE__URL".to_string(),
            "http://sensors.local/testi.json".to_string(),
        );
        let result = load_layered(&name, dashboard_environment().source(Some(vars)));
        std::fs::remove_dir_all(&dir).ok();

        let settings = result.unwrap();
        assert_eq!(settings.refresh.interval_secs, 12);
        assert_eq!(settings.source.url.as_deref(), Some("http://sensors.local/testi.json"));
        assert_eq!(settings.source.path, "from-file.json");
    }
}
