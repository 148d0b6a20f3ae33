// Domain layer - Sensor records, derived views and the rolling window
pub mod dashboard;
pub mod freshness;
pub mod metric;
pub mod rolling_window;
pub mod telemetry;
