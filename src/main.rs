//! `freezer-alarm` -- Sonoff TH10 fridge/freezer temperature alarm.
//!
//! Polls a Tasmota TH10 with a DS18B20 probe, raises a debounced alert
//! when the appliance warms past its threshold, and serves the current
//! temperature and contact (alert) state over HTTP.
//!
//! Configuration is read from the environment (or `.env`); see
//! [`Config`](freezer_alarm::config::Config).

use std::sync::Arc;

use freezer_alarm::config::environment::Config;
use freezer_alarm::modules::accessory::AccessoryInfo;
use freezer_alarm::services::metrics::{MetricsRegistry, MonitorMetricsCollector};
use freezer_alarm::services::monitor::{LoggingListener, MonitorEngine};
use freezer_alarm::services::sensor::TasmotaSensor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freezer_alarm=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    let metrics = MetricsRegistry::new().unwrap_or_else(|e| {
        tracing::error!("Failed to create metrics registry: {}", e);
        std::process::exit(1);
    });

    let sensor = Arc::new(TasmotaSensor::from_config(&config.monitor));
    let engine = MonitorEngine::from_config(&config.monitor, sensor)
        .with_listener(Arc::new(LoggingListener::new(config.monitor.device_name.clone())))
        .with_metrics(MonitorMetricsCollector::new(metrics.clone()));
    let handle = engine.handle();

    tracing::info!(
        device = %config.monitor.device_name,
        address = %config.monitor.target_address,
        threshold = config.monitor.alert_threshold,
        alert_count = config.monitor.consecutive_alerts_required,
        hysteresis = config.monitor.hysteresis_margin,
        "Configuration loaded"
    );

    let poller = Arc::new(engine).start();

    let app = freezer_alarm::create_app(
        handle,
        AccessoryInfo::from_config(&config.monitor),
        metrics,
    );

    let listener = match tokio::net::TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_address, e);
            poller.stop().await;
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{}", config.bind_address);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    poller.stop().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
