// Main entry point - Dependency injection, pollers and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::clock::{Clock, SystemClock};
use crate::application::data_manager::DataManager;
use crate::application::poller::spawn_refresh_loop;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::sensor_api::HttpSensorApi;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;
    tracing::info!("Using sensor endpoint {}", config.sensor_api.base_url);

    // Create sensor source (infrastructure layer)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = Arc::new(HttpSensorApi::new(&config.sensor_api));

    // Create data manager (application layer)
    let data_manager = Arc::new(DataManager::new(
        source,
        clock,
        config.data_manager.settings(),
    ));

    let outcome = data_manager.initialize().await;
    if outcome.success {
        tracing::info!("{}", outcome.message);
    } else {
        // Keep serving; the pollers and lazy reads retry
        tracing::warn!("{}", outcome.message);
    }

    // Start polling loops
    if let Some(period) = config.polling.dashboard_interval() {
        spawn_refresh_loop(data_manager.clone(), "dashboard", period);
    }
    if let Some(period) = config.polling.metrics_interval() {
        spawn_refresh_loop(data_manager.clone(), "metrics", period);
    }

    // Build router (presentation layer)
    let state = Arc::new(AppState { data_manager });
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting aerofarm-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
