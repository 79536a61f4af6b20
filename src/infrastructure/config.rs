use crate::application::clock::{DEFAULT_UTC_OFFSET_MINUTES, SystemClock};
use crate::domain::location::active_locations;
use chrono::TimeDelta;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub live: LiveSettings,
    #[serde(default)]
    pub datasets: DatasetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LiveSettings {
    #[serde(default = "default_retention_secs")]
    pub retention_secs: i64,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_fallback_count")]
    pub fallback_count: usize,
    #[serde(default = "default_location")]
    pub default_location: String,
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: i64,
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    #[serde(default = "default_sensor_ttl_secs")]
    pub sensor_cluster_ttl_secs: i64,
    #[serde(default = "default_max_history_days")]
    pub max_history_days: u32,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_retention_secs() -> i64 {
    180
}

fn default_refresh_interval_ms() -> u64 {
    2000
}

fn default_fallback_count() -> usize {
    10
}

fn default_location() -> String {
    "Vellore".to_string()
}

fn default_session_idle_secs() -> i64 {
    1800
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

fn default_sensor_ttl_secs() -> i64 {
    3600
}

fn default_max_history_days() -> u32 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            refresh_interval_ms: default_refresh_interval_ms(),
            fallback_count: default_fallback_count(),
            default_location: default_location(),
            session_idle_secs: default_session_idle_secs(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            sensor_cluster_ttl_secs: default_sensor_ttl_secs(),
            max_history_days: default_max_history_days(),
        }
    }
}

impl LiveSettings {
    pub fn retention(&self) -> TimeDelta {
        TimeDelta::seconds(self.retention_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn session_idle_ttl(&self) -> TimeDelta {
        TimeDelta::seconds(self.session_idle_secs)
    }

    pub fn clock(&self) -> anyhow::Result<SystemClock> {
        SystemClock::with_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            anyhow::anyhow!(
                "live.utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            )
        })
    }
}

impl DatasetSettings {
    pub fn sensor_cluster_ttl(&self) -> TimeDelta {
        TimeDelta::seconds(self.sensor_cluster_ttl_secs)
    }
}

impl AppConfig {
    /// Reject settings the services cannot start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !active_locations(false)
            .iter()
            .any(|l| l.name == self.live.default_location)
        {
            anyhow::bail!(
                "live.default_location {} is not a region location",
                self.live.default_location
            );
        }
        if self.live.refresh_interval_ms == 0 {
            anyhow::bail!("live.refresh_interval_ms must be positive");
        }
        if self.live.retention_secs <= 0 {
            anyhow::bail!("live.retention_secs must be positive");
        }
        if self.live.session_idle_secs <= 0 {
            anyhow::bail!("live.session_idle_secs must be positive");
        }
        self.live.clock()?;
        // the time trends page needs a full week
        if self.datasets.max_history_days < 7 {
            anyhow::bail!(
                "datasets.max_history_days must be at least 7, got {}",
                self.datasets.max_history_days
            );
        }
        Ok(())
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `CITY_PULSE__*`
/// environment variables, e.g. `CITY_PULSE__LIVE__REFRESH_INTERVAL_MS=500`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from("config/dashboard")
}

pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("CITY_PULSE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config_from("config/does-not-exist").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.live.retention(), TimeDelta::seconds(180));
        assert_eq!(config.live.refresh_interval(), Duration::from_secs(2));
        assert_eq!(config.live.fallback_count, 10);
        assert_eq!(config.live.default_location, "Vellore");
        assert_eq!(config.live.session_idle_ttl(), TimeDelta::minutes(30));
        assert_eq!(config.live.utc_offset_minutes, 330);
        assert_eq!(config.datasets.sensor_cluster_ttl(), TimeDelta::hours(1));
        assert_eq!(config.datasets.max_history_days, 30);
    }

    #[test]
    fn test_file_overrides_only_named_keys() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[live]\nrefresh_interval_ms = 500\n\n[datasets]\nmax_history_days = 14\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.live.refresh_interval_ms, 500);
        assert_eq!(config.live.retention_secs, 180);
        assert_eq!(config.datasets.max_history_days, 14);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.live.default_location = "Katpadi".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.live.refresh_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.datasets.max_history_days = 6;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.live.session_idle_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.live.utc_offset_minutes = 1500;
        assert!(config.validate().is_err());
        config.live.utc_offset_minutes = -300;
        assert!(config.validate().is_ok());
    }
}
