// Presentation layer - JSON read API over the data manager
pub mod app_state;
pub mod handlers;
