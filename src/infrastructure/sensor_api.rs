// HTTP sensor source backed by the farm's REST endpoint
use crate::application::sensor_source::{SensorApiError, SensorSource};
use crate::domain::dashboard::ApiHealth;
use crate::domain::telemetry::SensorRecord;
use crate::infrastructure::config::SensorApiSettings;
use crate::infrastructure::ttl_cache::TtlCache;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::error::Error as _;
use std::time::Duration;

const LATEST_PATH: &str = "/data/latest";
const LAST30_PATH: &str = "/data/last30";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
}

pub struct HttpSensorApi {
    base_url: String,
    client: reqwest::Client,
    fetch_timeout: Duration,
    health_timeout: Duration,
    latest_cache: TtlCache<SensorRecord>,
    history_cache: TtlCache<Vec<SensorRecord>>,
}

impl HttpSensorApi {
    pub fn new(settings: &SensorApiSettings) -> Self {
        let ttl = Duration::from_millis(settings.cache_ttl_ms);
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            fetch_timeout: Duration::from_millis(settings.fetch_timeout_ms),
            health_timeout: Duration::from_millis(settings.health_timeout_ms),
            latest_cache: TtlCache::new(ttl),
            history_cache: TtlCache::new(ttl),
        }
    }

    /// GET `path` and return the envelope's `data` value, if any.
    async fn get_data(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, SensorApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SensorApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let envelope = response.json::<Envelope>().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e, timeout)
            } else {
                SensorApiError::Shape(format!("invalid JSON envelope: {}", e))
            }
        })?;

        Ok(envelope.data.filter(|data| !data.is_null()))
    }

    async fn fetch_history(&self, timeout: Duration) -> Result<Vec<SensorRecord>, SensorApiError> {
        let data = self
            .get_data(LAST30_PATH, timeout)
            .await?
            .ok_or(SensorApiError::NoData)?;
        decode(data)
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, SensorApiError> {
    serde_json::from_value(data).map_err(|e| SensorApiError::Shape(e.to_string()))
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> SensorApiError {
    if e.is_timeout() {
        return SensorApiError::Timeout {
            after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };
    }

    // reqwest's Display omits the cause (refused, DNS, ...), so walk the chain
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    SensorApiError::Network(message)
}

#[async_trait]
impl SensorSource for HttpSensorApi {
    async fn fetch_latest(&self) -> Result<SensorRecord, SensorApiError> {
        if let Some(record) = self.latest_cache.get().await {
            tracing::debug!("Using cached latest record {}", record.timestamp);
            return Ok(record);
        }

        let data = self
            .get_data(LATEST_PATH, self.fetch_timeout)
            .await?
            .ok_or(SensorApiError::NoData)?;
        let record: SensorRecord = decode(data)?;

        tracing::debug!("Fetched latest record {}", record.timestamp);
        self.latest_cache.set(record.clone()).await;
        Ok(record)
    }

    async fn fetch_last_n(&self, n: usize) -> Result<Vec<SensorRecord>, SensorApiError> {
        let records = match self.history_cache.get().await {
            Some(records) => {
                tracing::debug!("Using cached history ({} records)", records.len());
                records
            }
            None => {
                let records = self.fetch_history(self.fetch_timeout).await?;
                if records.is_empty() {
                    tracing::warn!("Sensor endpoint returned an empty history");
                } else {
                    tracing::info!("Fetched {} historical records", records.len());
                }
                self.history_cache.set(records.clone()).await;
                records
            }
        };

        Ok(records.into_iter().take(n).collect())
    }

    async fn check_health(&self) -> ApiHealth {
        tracing::debug!("Testing sensor API health");

        match self.fetch_history(self.health_timeout).await {
            Ok(records) => match records.first() {
                Some(latest) => ApiHealth::healthy(records.len(), &latest.timestamp),
                None => ApiHealth::failed("API is responding but no data available"),
            },
            Err(SensorApiError::NoData) => {
                ApiHealth::failed("API is responding but no data available")
            }
            Err(SensorApiError::Http {
                status,
                status_text,
            }) => ApiHealth::failed(format!("API returned {}: {}", status, status_text)),
            Err(SensorApiError::Shape(detail)) => {
                ApiHealth::failed(format!("API is responding but data is malformed: {}", detail))
            }
            Err(e) => {
                tracing::warn!("API health check failed: {}", e);
                ApiHealth::failed(format!("API connection failed: {}", e))
            }
        }
    }

    async fn clear_cache(&self) {
        self.latest_cache.clear().await;
        self.history_cache.clear().await;
    }
}
