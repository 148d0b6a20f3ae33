// Data manager - Single coordination point between pollers, readers and the sensor source
//
// History is fetched once per initialization; steady-state polls fetch only the
// newest record and prepend it, so each tick costs one read instead of thirty.
use crate::application::clock::Clock;
use crate::application::sensor_source::{SensorApiError, SensorSource};
use crate::domain::dashboard::{
    ApiHealth, DataSummary, ExportData, InitOutcome, KpiTile, build_kpis,
};
use crate::domain::freshness::{self, LIVE_BADGE_THRESHOLD, PUMP_ON_THRESHOLD, PumpStatus};
use crate::domain::metric::Metric;
use crate::domain::rolling_window::{RollingWindow, WINDOW_SIZE};
use crate::domain::telemetry::{ChartData, LatestMetrics, SensorRecord, series_for};
use chrono::{Duration, NaiveDateTime};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

pub const INIT_COOLDOWN: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DataManagerError {
    #[error(transparent)]
    Source(#[from] SensorApiError),

    #[error("No data available for export")]
    NoData,
}

#[derive(Debug, Clone)]
pub struct DataManagerSettings {
    pub window_size: usize,
    pub init_cooldown: std::time::Duration,
    pub pump_on_threshold: Duration,
    pub live_threshold: Duration,
}

impl Default for DataManagerSettings {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            init_cooldown: INIT_COOLDOWN,
            pump_on_threshold: PUMP_ON_THRESHOLD,
            live_threshold: LIVE_BADGE_THRESHOLD,
        }
    }
}

#[derive(Debug, Default)]
struct ManagerState {
    initialized: bool,
    /// Farm-local start of the last successful run, for display.
    last_init: Option<NaiveDateTime>,
    /// Monotonic start of the same run; the cooldown is measured from here.
    last_init_at: Option<Instant>,
    /// Last successfully fetched latest record, served when a refresh fails.
    latest: Option<SensorRecord>,
}

pub struct DataManager {
    source: Arc<dyn SensorSource>,
    clock: Arc<dyn Clock>,
    settings: DataManagerSettings,
    /// Held for a whole initialization and around every prepend, so seeding
    /// never interleaves with a refresh and late callers await the in-flight run.
    init_gate: Mutex<()>,
    state: RwLock<ManagerState>,
    window: RwLock<RollingWindow>,
}

impl DataManager {
    pub fn new(
        source: Arc<dyn SensorSource>,
        clock: Arc<dyn Clock>,
        settings: DataManagerSettings,
    ) -> Self {
        let window = RollingWindow::new(settings.window_size);
        Self {
            source,
            clock,
            settings,
            init_gate: Mutex::new(()),
            state: RwLock::new(ManagerState::default()),
            window: RwLock::new(window),
        }
    }

    /// Load history and the latest record. Repeat calls inside the cooldown are no-ops.
    pub async fn initialize(&self) -> InitOutcome {
        let _gate = self.init_gate.lock().await;
        let now = self.clock.now();
        let started = Instant::now();

        {
            let state = self.state.read().await;
            let recent = state
                .last_init_at
                .is_some_and(|at| started.duration_since(at) < self.settings.init_cooldown);
            if state.initialized && recent {
                tracing::debug!("Data manager already initialized recently");
                return InitOutcome::ok("Data manager already initialized");
            }
        }

        tracing::info!("Initializing data manager");
        match self.load_history_and_latest().await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.initialized = true;
                state.last_init = Some(now);
                state.last_init_at = Some(started);
                let points = self.window.read().await.len();
                tracing::info!("Data manager initialized with {} rolling records", points);
                InitOutcome::ok("Data manager initialized successfully")
            }
            Err(e) => {
                self.state.write().await.initialized = false;
                tracing::error!("Failed to initialize data manager: {}", e);
                InitOutcome::failed(format!("Failed to initialize: {}", e))
            }
        }
    }

    async fn load_history_and_latest(&self) -> Result<(), SensorApiError> {
        let history = self.source.fetch_last_n(self.settings.window_size).await?;
        if history.is_empty() {
            tracing::warn!("Sensor endpoint returned no history yet");
        }
        self.window.write().await.seed(history);

        self.record_latest().await?;
        Ok(())
    }

    /// Fetch the newest record, prepend it and remember it. Caller holds the gate.
    async fn record_latest(&self) -> Result<SensorRecord, SensorApiError> {
        let record = self.source.fetch_latest().await?;
        self.window.write().await.prepend(record.clone());
        self.state.write().await.latest = Some(record.clone());
        Ok(record)
    }

    async fn ensure_initialized(&self) {
        if self.state.read().await.initialized {
            return;
        }

        tracing::info!("Data manager not initialized, initializing now");
        let outcome = self.initialize().await;
        if !outcome.success {
            tracing::warn!("Lazy initialization failed: {}", outcome.message);
        }
    }

    fn derive_metrics(&self, record: &SensorRecord) -> LatestMetrics {
        let status = freshness::pump_status(
            self.clock.now(),
            &record.timestamp,
            self.settings.pump_on_threshold,
        );
        LatestMetrics::from_record(record, status)
    }

    /// Latest metrics, falling back to the last good record if the fetch fails.
    pub async fn get_latest_metrics(&self) -> Result<LatestMetrics, DataManagerError> {
        self.ensure_initialized().await;

        let _gate = self.init_gate.lock().await;
        match self.record_latest().await {
            Ok(record) => Ok(self.derive_metrics(&record)),
            Err(e) => {
                let cached = self.state.read().await.latest.clone();
                match cached {
                    Some(record) => {
                        tracing::warn!("Serving cached latest metrics after fetch failure: {}", e);
                        Ok(self.derive_metrics(&record))
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    pub async fn get_chart_data(&self) -> ChartData {
        self.ensure_initialized().await;
        let snapshot = self.window.read().await.snapshot();
        ChartData::from_records(&snapshot)
    }

    /// Polling hot path: one latest fetch, no history. Errors reach the poller.
    pub async fn refresh_latest_data(&self) -> Result<LatestMetrics, DataManagerError> {
        let _gate = self.init_gate.lock().await;
        tracing::debug!("Refreshing latest data");

        match self.record_latest().await {
            Ok(record) => Ok(self.derive_metrics(&record)),
            Err(e) => {
                tracing::error!("Failed to refresh latest data: {}", e);
                Err(e.into())
            }
        }
    }

    /// Whether the data feed counts as live for the UI badge.
    pub async fn live_badge_status(&self) -> PumpStatus {
        let state = self.state.read().await;
        match &state.latest {
            Some(record) => freshness::live_badge_status(
                self.clock.now(),
                &record.timestamp,
                self.settings.live_threshold,
            ),
            None => PumpStatus::Off,
        }
    }

    pub async fn get_kpis(&self) -> Result<Vec<KpiTile>, DataManagerError> {
        let latest = self.get_latest_metrics().await?;
        let charts = self.get_chart_data().await;
        Ok(build_kpis(&latest, &charts))
    }

    pub async fn get_api_health(&self) -> ApiHealth {
        self.source.check_health().await
    }

    pub async fn get_data_summary(&self) -> DataSummary {
        let rolling_data_points = self.window.read().await.len();
        let state = self.state.read().await;

        DataSummary {
            rolling_data_points,
            cache_status: (if rolling_data_points > 0 { "Active" } else { "Empty" }).to_string(),
            is_initialized: state.initialized,
            last_init_time: state
                .last_init
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "Never".to_string()),
        }
    }

    /// Ascending series for one metric, from the window or a direct history fetch.
    pub async fn get_export_data(&self, metric: Metric) -> Result<ExportData, DataManagerError> {
        let mut records = self.window.read().await.snapshot();

        if records.is_empty() {
            tracing::info!("No rolling data for export, fetching history");
            records = self.source.fetch_last_n(self.settings.window_size).await?;
        }

        if records.is_empty() {
            return Err(DataManagerError::NoData);
        }

        let data = series_for(&records, metric);
        tracing::debug!("Prepared export data for {}: {} points", metric, data.len());

        Ok(ExportData {
            metric,
            total_points: data.len(),
            data,
            is_real_data: true,
        })
    }

    /// Drop all cached data and return to the uninitialized state.
    pub async fn reset(&self) {
        let _gate = self.init_gate.lock().await;
        tracing::info!("Resetting data manager");

        self.window.write().await.clear();
        self.source.clear_cache().await;
        *self.state.write().await = ManagerState::default();
    }
}
