// HTTP request handlers
use crate::application::data_manager::DataManagerError;
use crate::domain::metric::Metric;
use crate::presentation::app_state::AppState;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api-health", get(api_health))
        .route("/metrics/latest", get(latest_metrics))
        .route("/metrics/live", get(live_status))
        .route("/metrics/charts", get(chart_data))
        .route("/metrics/kpis", get(kpis))
        .route("/metrics/summary", get(data_summary))
        .route("/metrics/export/:metric", get(export_data))
        .route("/metrics/initialize", post(initialize))
        .route("/metrics/reset", post(reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(e: DataManagerError) -> Response {
    let status = match &e {
        DataManagerError::Source(source) if !source.is_no_data() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };
    tracing::warn!("Request failed with {}: {}", status, e);
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

/// Liveness of this service, not of the sensor endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Reachability of the sensor endpoint
pub async fn api_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.data_manager.get_api_health().await)
}

pub async fn latest_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.data_manager.get_latest_metrics().await {
        Ok(metrics) => Json(metrics).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn live_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.data_manager.live_badge_status().await;
    Json(json!({ "live": status }))
}

pub async fn chart_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.data_manager.get_chart_data().await)
}

pub async fn kpis(State(state): State<Arc<AppState>>) -> Response {
    match state.data_manager.get_kpis().await {
        Ok(tiles) => Json(tiles).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn data_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.data_manager.get_data_summary().await)
}

pub async fn export_data(
    Path(metric): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let metric = match metric.parse::<Metric>() {
        Ok(metric) => metric,
        Err(message) => {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response();
        }
    };

    match state.data_manager.get_export_data(metric).await {
        Ok(export) => Json(export).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn initialize(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.data_manager.initialize().await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(outcome))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.data_manager.reset().await;
    StatusCode::NO_CONTENT
}
