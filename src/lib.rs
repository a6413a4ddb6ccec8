pub mod config;
pub mod modules;
pub mod services;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use modules::accessory::{accessory_routes, AccessoryInfo};
use modules::metrics::metrics_routes;
use services::metrics::MetricsRegistry;
use services::monitor::MonitorHandle;

pub struct AppState {
    pub monitor: MonitorHandle,
    pub accessory: AccessoryInfo,
    pub metrics: Arc<MetricsRegistry>,
}

pub fn create_app(
    monitor: MonitorHandle,
    accessory: AccessoryInfo,
    metrics: Arc<MetricsRegistry>,
) -> Router {
    let state = Arc::new(AppState {
        monitor,
        accessory,
        metrics,
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(accessory_routes())
        .merge(metrics_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Fridge/Freezer Alarm"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
