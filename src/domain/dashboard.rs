// Dashboard read models served to the presentation layer
use serde::Serialize;

use super::metric::{KpiStatus, Metric};
use super::telemetry::{ChartData, ChartPoint, LatestMetrics, SeriesStats};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub metric: Metric,
    pub label: String,
    pub unit: String,
    pub value: f64,
    pub status: KpiStatus,
    pub stats: Option<SeriesStats>,
}

impl KpiTile {
    pub fn new(metric: Metric, value: f64, stats: Option<SeriesStats>) -> Self {
        Self {
            metric,
            label: metric.label().to_string(),
            unit: metric.unit().to_string(),
            value,
            status: metric.classify(value),
            stats,
        }
    }
}

/// One tile per metric from the latest reading, with stats over the window.
pub fn build_kpis(latest: &LatestMetrics, charts: &ChartData) -> Vec<KpiTile> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let value = match metric {
                Metric::Ph => latest.ph,
                Metric::AirTemp => latest.air_temp,
                Metric::WaterTemp => latest.water_temp,
                Metric::Tds => latest.tds,
                Metric::Humidity => latest.humidity,
            };
            KpiTile::new(metric, value, SeriesStats::from_points(charts.series(metric)))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub rolling_data_points: usize,
    pub cache_status: String,
    pub is_initialized: bool,
    pub last_init_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    pub success: bool,
    pub message: String,
    pub data_count: usize,
}

impl ApiHealth {
    pub fn healthy(data_count: usize, latest_timestamp: &str) -> Self {
        Self {
            success: true,
            message: format!(
                "API healthy - {} data points available. Latest: {}",
                data_count, latest_timestamp
            ),
            data_count,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub metric: Metric,
    pub data: Vec<ChartPoint>,
    pub is_real_data: bool,
    pub total_points: usize,
}

/// Outcome of an initialization attempt. Never an error for the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitOutcome {
    pub success: bool,
    pub message: String,
}

impl InitOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
