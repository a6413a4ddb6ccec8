use async_trait::async_trait;
use serde_json::Value;

/// JSON pointer to the DS18B20 reading inside a Tasmota `status 8` reply.
pub const TEMPERATURE_POINTER: &str = "/StatusSNS/DS18B20/Temperature";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Sensor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid JSON from sensor ({reason}): {body}")]
    InvalidPayload { body: String, reason: String },
    #[error("No numeric DS18B20 temperature in payload: {body}")]
    MissingField { body: String },
}

impl FetchError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::InvalidPayload { .. } => "invalid_payload",
            Self::MissingField { .. } => "missing_field",
        }
    }
}

/// Anything that can produce one temperature reading per call.
#[async_trait]
pub trait TemperatureSource: Send + Sync {
    async fn fetch(&self) -> Result<f64, FetchError>;

    /// Human readable location, for logs.
    fn describe(&self) -> String {
        "temperature source".to_string()
    }
}

/// Parse a status body and pull the probe temperature out of it.
pub fn parse_status_body(body: &str) -> Result<f64, FetchError> {
    let reply: Value = serde_json::from_str(body).map_err(|e| FetchError::InvalidPayload {
        body: body.to_string(),
        reason: e.to_string(),
    })?;

    reply
        .pointer(TEMPERATURE_POINTER)
        .and_then(as_temperature)
        .ok_or_else(|| FetchError::MissingField {
            body: body.to_string(),
        })
}

/// Tasmota reports numbers, but some builds quote them.
fn as_temperature(value: &Value) -> Option<f64> {
    let reading = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    reading.is_finite().then_some(reading)
}
