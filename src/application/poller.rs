// Polling loops that keep the latest record and rolling window fresh
use crate::application::data_manager::DataManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn a loop calling `refresh_latest_data` every `period`.
///
/// A failed tick is logged and skipped; cached values stay in place and the
/// next tick is the retry. Loops are independent and may overlap freely.
pub fn spawn_refresh_loop(
    manager: Arc<DataManager>,
    name: &'static str,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Starting {} refresh loop every {:?}", name, period);
        loop {
            ticker.tick().await;
            match manager.refresh_latest_data().await {
                Ok(metrics) => tracing::debug!(
                    "{} refresh: {} pump={:?}",
                    name,
                    metrics.timestamp,
                    metrics.pump_status
                ),
                Err(e) => tracing::warn!("{} refresh failed, keeping cached data: {}", name, e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::manual::ManualClock;
    use crate::application::data_manager::DataManagerSettings;
    use crate::application::sensor_source::SensorApiError;
    use crate::application::sensor_source::fake::FakeSource;
    use crate::domain::telemetry::tests::record;

    #[tokio::test]
    async fn test_loop_keeps_polling_through_failures() {
        let source = Arc::new(FakeSource::new(
            Err(SensorApiError::Network("connection refused".into())),
            Ok(Vec::new()),
        ));
        let clock = Arc::new(ManualClock::at("2025:10:23 12:00:00"));
        let manager = Arc::new(DataManager::new(
            source.clone(),
            clock,
            DataManagerSettings::default(),
        ));

        let handle = spawn_refresh_loop(manager.clone(), "test", Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(source.latest_calls() >= 2);

        source.set_latest(Ok(record("2025:10:23 12:00:00", 6.5)));
        tokio::time::sleep(Duration::from_millis(35)).await;
        handle.abort();

        let summary = manager.get_data_summary().await;
        assert_eq!(summary.rolling_data_points, 1);
        assert_eq!(source.bulk_calls(), 0);
    }
}
