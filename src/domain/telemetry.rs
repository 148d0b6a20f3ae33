// Sensor telemetry domain models
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::freshness::PumpStatus;
use super::metric::Metric;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One reading as delivered by the farm's sensor endpoint.
///
/// Timestamps use the controller's `YYYY:MM:DD HH:MM:SS` layout and carry no
/// zone; they are the farm's local wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRecord {
    pub timestamp: String,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub air_temp: f64,
    pub water_temp: f64,
    pub tds: f64,
    pub humidity: f64,
}

impl SensorRecord {
    pub fn value_of(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ph => self.ph,
            Metric::AirTemp => self.air_temp,
            Metric::WaterTemp => self.water_temp,
            Metric::Tds => self.tds,
            Metric::Humidity => self.humidity,
        }
    }
}

/// Consumer-facing view of the most recent record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestMetrics {
    pub timestamp: String,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub air_temp: f64,
    pub water_temp: f64,
    pub tds: f64,
    pub humidity: f64,
    /// The endpoint has no dissolved oxygen probe; always 0.
    pub dissolved_oxygen: f64,
    pub pump_status: PumpStatus,
}

impl LatestMetrics {
    pub fn from_record(record: &SensorRecord, pump_status: PumpStatus) -> Self {
        Self {
            timestamp: record.timestamp.clone(),
            ph: record.ph,
            air_temp: record.air_temp,
            water_temp: record.water_temp,
            tds: record.tds,
            humidity: record.humidity,
            dissolved_oxygen: 0.0,
            pump_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub ts: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(ts: String, value: f64) -> Self {
        Self { ts, value }
    }
}

/// One ascending series per measured quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(rename = "pH")]
    pub ph: Vec<ChartPoint>,
    pub air_temp: Vec<ChartPoint>,
    pub water_temp: Vec<ChartPoint>,
    pub tds: Vec<ChartPoint>,
    pub humidity: Vec<ChartPoint>,
}

impl ChartData {
    /// Build all series from a newest-first window snapshot.
    pub fn from_records(records: &[SensorRecord]) -> Self {
        Self {
            ph: series_for(records, Metric::Ph),
            air_temp: series_for(records, Metric::AirTemp),
            water_temp: series_for(records, Metric::WaterTemp),
            tds: series_for(records, Metric::Tds),
            humidity: series_for(records, Metric::Humidity),
        }
    }

    pub fn series(&self, metric: Metric) -> &[ChartPoint] {
        match metric {
            Metric::Ph => &self.ph,
            Metric::AirTemp => &self.air_temp,
            Metric::WaterTemp => &self.water_temp,
            Metric::Tds => &self.tds,
            Metric::Humidity => &self.humidity,
        }
    }

    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.series(*m).is_empty())
    }
}

/// Ascending (oldest first) series for one metric from newest-first records.
pub fn series_for(records: &[SensorRecord], metric: Metric) -> Vec<ChartPoint> {
    records
        .iter()
        .rev()
        .map(|r| ChartPoint::new(iso_timestamp(&r.timestamp), r.value_of(metric)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl SeriesStats {
    pub fn from_points(points: &[ChartPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let (min, max, sum) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), p| (min.min(p.value), max.max(p.value), sum + p.value),
        );

        Some(Self {
            min,
            max,
            avg: sum / points.len() as f64,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed sensor timestamp {raw:?}")]
pub struct TimestampError {
    pub raw: String,
}

/// Convert "2025:10:23 12:43:57" into "2025-10-23T12:43:57".
///
/// Only the date half is rewritten; a string without a space is returned as is.
pub fn iso_timestamp(raw: &str) -> String {
    match raw.split_once(' ') {
        Some((date, time)) => format!("{}T{}", date.replace(':', "-"), time),
        None => raw.to_string(),
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    NaiveDateTime::parse_from_str(&iso_timestamp(raw.trim()), ISO_FORMAT).map_err(|_| {
        TimestampError {
            raw: raw.to_string(),
        }
    })
}
