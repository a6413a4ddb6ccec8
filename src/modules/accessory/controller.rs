use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;
use crate::modules::accessory::schema::{
    AccessoryResponse, ContactResponse, StatusResponse, TemperatureResponse,
};

pub async fn get_accessory(State(state): State<Arc<AppState>>) -> Json<AccessoryResponse> {
    Json(AccessoryResponse::new(state.accessory.clone()))
}

/// Cached value only; never touches the sensor.
pub async fn get_temperature(State(state): State<Arc<AppState>>) -> Json<TemperatureResponse> {
    let temperature = state.monitor.get_temperature();
    tracing::debug!("Current appliance temperature: {}", temperature);
    Json(TemperatureResponse { temperature })
}

pub async fn get_contact_state(State(state): State<Arc<AppState>>) -> Json<ContactResponse> {
    let alert = state.monitor.get_alert_state();
    tracing::debug!("Contact state (= appliance alert flag): {}", alert);
    Json(ContactResponse::new(alert))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse::from(state.monitor.snapshot()))
}
