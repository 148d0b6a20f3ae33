// Application layer - Use cases over the sensor source
pub mod clock;
pub mod data_manager;
pub mod poller;
pub mod sensor_source;
