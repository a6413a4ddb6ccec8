use serde::Serialize;

use crate::config::MonitorConfig;
use crate::services::monitor::{ContactState, MonitorSnapshot};

/// Lowest temperature the characteristic advertises; freezers go well below 0.
pub const TEMPERATURE_MIN_VALUE: f64 = -50.0;
pub const TEMPERATURE_MAX_VALUE: f64 = 100.0;

// =============================================================================
// ACCESSORY INFORMATION
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AccessoryInfo {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: String,
}

impl AccessoryInfo {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            name: config.device_name.clone(),
            manufacturer: "Itead / Tasmota".to_string(),
            model: "Sonoff TH10 Fridge/Freezer Alarm".to_string(),
            serial_number: "N/A".to_string(),
            firmware_revision: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    #[serde(rename = "type")]
    pub service_type: &'static str,
    pub name: String,
    pub characteristic: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AccessoryResponse {
    pub information: AccessoryInfo,
    pub services: Vec<ServiceDescriptor>,
}

impl AccessoryResponse {
    pub fn new(information: AccessoryInfo) -> Self {
        let services = vec![
            ServiceDescriptor {
                service_type: "contact_sensor",
                name: information.name.clone(),
                characteristic: "contact_sensor_state",
                min_value: None,
                max_value: None,
            },
            ServiceDescriptor {
                service_type: "temperature_sensor",
                name: "Current Temperature".to_string(),
                characteristic: "current_temperature",
                min_value: Some(TEMPERATURE_MIN_VALUE),
                max_value: Some(TEMPERATURE_MAX_VALUE),
            },
        ];
        Self { information, services }
    }
}

// =============================================================================
// READINGS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct TemperatureResponse {
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub alert: bool,
    pub contact_state: ContactState,
    pub value: u8,
}

impl ContactResponse {
    pub fn new(alert: bool) -> Self {
        let contact_state = ContactState::from_alert(alert);
        Self {
            alert,
            contact_state,
            value: contact_state.value(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub snapshot: MonitorSnapshot,
    pub contact_state: ContactState,
    pub stale: bool,
}

impl From<MonitorSnapshot> for StatusResponse {
    fn from(snapshot: MonitorSnapshot) -> Self {
        Self {
            contact_state: ContactState::from_alert(snapshot.state.alert_active()),
            stale: snapshot.is_stale(),
            snapshot,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
