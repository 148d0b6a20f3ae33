// Source trait for sensor data access
use crate::domain::dashboard::ApiHealth;
use crate::domain::telemetry::SensorRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single fetch. Nothing retries on these; the next poll does.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SensorApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("HTTP error! status: {status} - {status_text}")]
    Http { status: u16, status_text: String },

    #[error("No data available from API")]
    NoData,

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl SensorApiError {
    /// The endpoint answered but had nothing usable, as opposed to being down.
    pub fn is_no_data(&self) -> bool {
        matches!(self, SensorApiError::NoData | SensorApiError::Shape(_))
    }
}

#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Most recent record
    async fn fetch_latest(&self) -> Result<SensorRecord, SensorApiError>;

    /// Up to `n` records, newest first. An empty history is not an error.
    async fn fetch_last_n(&self, n: usize) -> Result<Vec<SensorRecord>, SensorApiError>;

    /// Probe the endpoint, bypassing any response cache
    async fn check_health(&self) -> ApiHealth;

    /// Drop cached responses so the next fetch goes to the network
    async fn clear_cache(&self);
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted in-memory source that counts its calls.
    pub(crate) struct FakeSource {
        latest: Mutex<Result<SensorRecord, SensorApiError>>,
        history: Mutex<Result<Vec<SensorRecord>, SensorApiError>>,
        delay: Option<Duration>,
        pub latest_calls: AtomicUsize,
        pub bulk_calls: AtomicUsize,
        pub cache_clears: AtomicUsize,
    }

    impl FakeSource {
        pub fn new(
            latest: Result<SensorRecord, SensorApiError>,
            history: Result<Vec<SensorRecord>, SensorApiError>,
        ) -> Self {
            Self {
                latest: Mutex::new(latest),
                history: Mutex::new(history),
                delay: None,
                latest_calls: AtomicUsize::new(0),
                bulk_calls: AtomicUsize::new(0),
                cache_clears: AtomicUsize::new(0),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn set_latest(&self, latest: Result<SensorRecord, SensorApiError>) {
            *self.latest.lock().unwrap() = latest;
        }

        pub fn set_history(&self, history: Result<Vec<SensorRecord>, SensorApiError>) {
            *self.history.lock().unwrap() = history;
        }

        pub fn latest_calls(&self) -> usize {
            self.latest_calls.load(Ordering::SeqCst)
        }

        pub fn bulk_calls(&self) -> usize {
            self.bulk_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SensorSource for FakeSource {
        async fn fetch_latest(&self) -> Result<SensorRecord, SensorApiError> {
            self.latest_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.latest.lock().unwrap().clone()
        }

        async fn fetch_last_n(&self, n: usize) -> Result<Vec<SensorRecord>, SensorApiError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.history
                .lock()
                .unwrap()
                .clone()
                .map(|records| records.into_iter().take(n).collect())
        }

        async fn check_health(&self) -> ApiHealth {
            match self.history.lock().unwrap().as_ref() {
                Ok(records) if records.is_empty() => {
                    ApiHealth::failed("API is responding but no data available")
                }
                Ok(records) => ApiHealth::healthy(records.len(), &records[0].timestamp),
                Err(e) => ApiHealth::failed(format!("API connection failed: {}", e)),
            }
        }

        async fn clear_cache(&self) {
            self.cache_clears.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let timeout = SensorApiError::Timeout { after_ms: 10000 };
        assert_eq!(timeout.to_string(), "request timed out after 10000ms");

        let http = SensorApiError::Http {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(http.to_string(), "HTTP error! status: 503 - Service Unavailable");
    }

    #[test]
    fn test_no_data_classification() {
        assert!(SensorApiError::NoData.is_no_data());
        assert!(SensorApiError::Shape("missing pH".into()).is_no_data());
        assert!(!SensorApiError::Network("refused".into()).is_no_data());
        assert!(!SensorApiError::Timeout { after_ms: 1 }.is_no_data());
    }
}
