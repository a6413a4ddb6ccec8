use axum::http::StatusCode;
use std::time::Duration;

use freezer_alarm::config::environment::DEFAULT_STATUS_PATH;
use freezer_alarm::services::sensor::{FetchError, TasmotaClient, TasmotaSensor, TemperatureSource};

use crate::common::{spawn_sensor, spawn_slow_sensor, status_body, unused_address};

// =============================================================================
// INTEGRATION TESTS - TASMOTA STATUS CLIENT
// Runs against a local stand-in for the TH10 web server
// =============================================================================

fn client() -> TasmotaClient {
    TasmotaClient::new(Duration::from_secs(2))
}

#[tokio::test]
async fn test_fetch_numeric_temperature() {
    let address = spawn_sensor(StatusCode::OK, status_body(-18.4)).await;

    let temperature = client().fetch(&address, DEFAULT_STATUS_PATH).await.unwrap();
    assert_eq!(temperature, -18.4);
}

#[tokio::test]
async fn test_fetch_quoted_temperature() {
    let address = spawn_sensor(
        StatusCode::OK,
        r#"{"StatusSNS":{"DS18B20":{"Temperature":"3.2"}}}"#,
    )
    .await;

    let temperature = client().fetch(&address, "/cm").await.unwrap();
    assert_eq!(temperature, 3.2);
}

#[tokio::test]
async fn test_fetch_not_json() {
    let address = spawn_sensor(StatusCode::OK, "not json").await;

    let err = client().fetch(&address, DEFAULT_STATUS_PATH).await.unwrap_err();
    match err {
        FetchError::InvalidPayload { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected InvalidPayload, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_without_probe() {
    // TH10 with the probe unplugged reports no DS18B20 block at all.
    let address = spawn_sensor(
        StatusCode::OK,
        r#"{"StatusSNS":{"Time":"2020-06-01T10:00:00","TempUnit":"C"}}"#,
    )
    .await;

    let err = client().fetch(&address, DEFAULT_STATUS_PATH).await.unwrap_err();
    assert!(matches!(err, FetchError::MissingField { .. }));
}

#[tokio::test]
async fn test_fetch_http_error_status() {
    let address = spawn_sensor(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;

    let err = client().fetch(&address, DEFAULT_STATUS_PATH).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            body: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn test_fetch_unreachable() {
    let address = unused_address().await;

    let err = client().fetch(&address, DEFAULT_STATUS_PATH).await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_fetch_times_out() {
    let address = spawn_slow_sensor(Duration::from_secs(5), status_body(-20.0)).await;
    let client = TasmotaClient::new(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let err = client.fetch(&address, DEFAULT_STATUS_PATH).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(ref msg) if msg.contains("no response")));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_sensor_source_uses_bound_address() {
    let address = spawn_sensor(StatusCode::OK, status_body(5.5)).await;
    let sensor = TasmotaSensor::new(client(), address.clone(), DEFAULT_STATUS_PATH);

    assert_eq!(sensor.fetch().await.unwrap(), 5.5);
    assert_eq!(
        sensor.describe(),
        format!("http://{}/cm?cmnd=status%208", address)
    );
}
