use crate::application::data_manager::DataManagerSettings;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://iit-project.vercel.app";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub sensor_api: SensorApiSettings,
    pub data_manager: DataManagerConfig,
    pub polling: PollingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorApiSettings {
    pub base_url: String,
    pub cache_ttl_ms: u64,
    pub fetch_timeout_ms: u64,
    pub health_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataManagerConfig {
    pub window_size: usize,
    pub init_cooldown_ms: u64,
    pub pump_on_threshold_ms: u64,
    pub live_threshold_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    pub dashboard_interval_ms: u64,
    pub metrics_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl DataManagerConfig {
    pub fn settings(&self) -> DataManagerSettings {
        DataManagerSettings {
            window_size: self.window_size,
            init_cooldown: Duration::from_millis(self.init_cooldown_ms),
            pump_on_threshold: millis(self.pump_on_threshold_ms),
            live_threshold: millis(self.live_threshold_ms),
        }
    }
}

impl PollingConfig {
    /// Zero disables a loop
    pub fn dashboard_interval(&self) -> Option<Duration> {
        interval(self.dashboard_interval_ms)
    }

    pub fn metrics_interval(&self) -> Option<Duration> {
        interval(self.metrics_interval_ms)
    }
}

fn interval(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn millis(ms: u64) -> chrono::Duration {
    chrono::Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// Defaults, then `config/sensor.toml` if present, then `AEROFARM__*` env vars.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    build_app_config(config::File::with_name("config/sensor").required(false))
}

fn build_app_config<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("sensor_api.base_url", DEFAULT_BASE_URL)?
        .set_default("sensor_api.cache_ttl_ms", 5000_i64)?
        .set_default("sensor_api.fetch_timeout_ms", 10000_i64)?
        .set_default("sensor_api.health_timeout_ms", 5000_i64)?
        .set_default("data_manager.window_size", 30_i64)?
        .set_default("data_manager.init_cooldown_ms", 10000_i64)?
        .set_default("data_manager.pump_on_threshold_ms", 120000_i64)?
        .set_default("data_manager.live_threshold_ms", 15000_i64)?
        .set_default("polling.dashboard_interval_ms", 30000_i64)?
        .set_default("polling.metrics_interval_ms", 2000_i64)?
        .set_default("server.bind", "0.0.0.0:8080")?
        .add_source(file)
        .add_source(config::Environment::with_prefix("AEROFARM").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
