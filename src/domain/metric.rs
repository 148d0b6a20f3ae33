// Measured quantities and their KPI bands
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "airTemp")]
    AirTemp,
    #[serde(rename = "waterTemp")]
    WaterTemp,
    #[serde(rename = "tds")]
    Tds,
    #[serde(rename = "humidity")]
    Humidity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Good,
    Warning,
    Danger,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Ph,
        Metric::AirTemp,
        Metric::WaterTemp,
        Metric::Tds,
        Metric::Humidity,
    ];

    /// Wire key used by the sensor endpoint.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Ph => "pH",
            Metric::AirTemp => "airTemp",
            Metric::WaterTemp => "waterTemp",
            Metric::Tds => "tds",
            Metric::Humidity => "humidity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Ph => "pH Level",
            Metric::AirTemp => "Air Temperature",
            Metric::WaterTemp => "Water Temperature",
            Metric::Tds => "TDS",
            Metric::Humidity => "Humidity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Ph => "pH",
            Metric::AirTemp | Metric::WaterTemp => "°C",
            Metric::Tds => "ppm",
            Metric::Humidity => "%",
        }
    }

    /// Target value for an aeroponic nutrient loop.
    pub fn optimal(self) -> f64 {
        match self {
            Metric::Ph => 6.5,
            Metric::AirTemp => 26.0,
            Metric::WaterTemp => 21.0,
            Metric::Tds => 400.0,
            Metric::Humidity => 75.0,
        }
    }

    pub fn tolerance(self) -> f64 {
        match self {
            Metric::Ph => 0.8,
            Metric::AirTemp => 3.0,
            Metric::WaterTemp => 2.0,
            Metric::Tds => 60.0,
            Metric::Humidity => 10.0,
        }
    }

    /// Within half the tolerance is good, within the tolerance a warning.
    pub fn classify(self, value: f64) -> KpiStatus {
        let diff = (value - self.optimal()).abs();
        let tolerance = self.tolerance();
        if diff < tolerance * 0.5 {
            KpiStatus::Good
        } else if diff < tolerance {
            KpiStatus::Warning
        } else {
            KpiStatus::Danger
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(Metric::Ph.classify(6.5), KpiStatus::Good);
        assert_eq!(Metric::Ph.classify(6.0), KpiStatus::Warning);
        assert_eq!(Metric::Ph.classify(5.5), KpiStatus::Danger);
        assert_eq!(Metric::Tds.classify(425.0), KpiStatus::Good);
        assert_eq!(Metric::Tds.classify(340.0), KpiStatus::Danger);
        assert_eq!(Metric::Humidity.classify(82.0), KpiStatus::Warning);
    }

    #[test]
    fn test_parse_metric_key() {
        assert_eq!("pH".parse::<Metric>(), Ok(Metric::Ph));
        assert_eq!("airtemp".parse::<Metric>(), Ok(Metric::AirTemp));
        assert_eq!("waterTemp".parse::<Metric>(), Ok(Metric::WaterTemp));
        assert!("oxygen".parse::<Metric>().is_err());
    }
}
