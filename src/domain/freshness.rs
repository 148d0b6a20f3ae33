// Pump and live-feed status derived from record age
//
// The endpoint never reports actuator state. A pump that is running keeps the
// controller posting readings, so the age of the newest record is the signal.
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::telemetry::parse_timestamp;

pub const PUMP_ON_THRESHOLD: Duration = Duration::minutes(2);
pub const LIVE_BADGE_THRESHOLD: Duration = Duration::seconds(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpStatus {
    On,
    Off,
}

/// Age of a record relative to `now`, or `None` if its timestamp is malformed.
pub fn record_age(now: NaiveDateTime, timestamp: &str) -> Option<Duration> {
    match parse_timestamp(timestamp) {
        Ok(at) => Some(now - at),
        Err(e) => {
            tracing::warn!("Cannot derive record age: {}", e);
            None
        }
    }
}

fn status_within(now: NaiveDateTime, timestamp: &str, threshold: Duration) -> PumpStatus {
    match record_age(now, timestamp) {
        Some(age) if age <= threshold => PumpStatus::On,
        _ => PumpStatus::Off,
    }
}

/// Whether the pump is physically running. Malformed timestamps read as off.
pub fn pump_status(now: NaiveDateTime, timestamp: &str, threshold: Duration) -> PumpStatus {
    let status = status_within(now, timestamp, threshold);
    tracing::debug!("Pump status for record {}: {:?}", timestamp, status);
    status
}

/// Whether the data feed is live. Separate from the pump signal and much tighter.
pub fn live_badge_status(now: NaiveDateTime, timestamp: &str, threshold: Duration) -> PumpStatus {
    status_within(now, timestamp, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::parse_timestamp;

    fn at(raw: &str) -> NaiveDateTime {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn test_two_thresholds_disagree_at_62_seconds() {
        let now = at("2025:10:23 12:45:00");
        let ts = "2025:10:23 12:43:57";

        assert_eq!(pump_status(now, ts, PUMP_ON_THRESHOLD), PumpStatus::On);
        assert_eq!(live_badge_status(now, ts, LIVE_BADGE_THRESHOLD), PumpStatus::Off);
    }

    #[test]
    fn test_pump_threshold_is_inclusive() {
        let ts = "2025:10:23 12:00:00";
        assert_eq!(
            pump_status(at("2025:10:23 12:02:00"), ts, PUMP_ON_THRESHOLD),
            PumpStatus::On
        );
        assert_eq!(
            pump_status(at("2025:10:23 12:02:01"), ts, PUMP_ON_THRESHOLD),
            PumpStatus::Off
        );
    }

    #[test]
    fn test_live_badge_within_fifteen_seconds() {
        let now = at("2025:10:23 12:00:15");
        assert_eq!(
            live_badge_status(now, "2025:10:23 12:00:00", LIVE_BADGE_THRESHOLD),
            PumpStatus::On
        );
    }

    #[test]
    fn test_malformed_timestamp_is_off() {
        let now = at("2025:10:23 12:00:00");
        assert_eq!(pump_status(now, "not a time", PUMP_ON_THRESHOLD), PumpStatus::Off);
        assert_eq!(live_badge_status(now, "", LIVE_BADGE_THRESHOLD), PumpStatus::Off);
        assert!(record_age(now, "2025:10:23").is_none());
    }

    #[test]
    fn test_status_is_pure() {
        let now = at("2025:10:23 12:01:00");
        let ts = "2025:10:23 12:00:00";
        let first = pump_status(now, ts, PUMP_ON_THRESHOLD);
        let second = pump_status(now, ts, PUMP_ON_THRESHOLD);
        assert_eq!(first, second);
    }
}
