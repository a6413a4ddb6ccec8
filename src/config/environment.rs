use std::env;
use std::str::FromStr;
use std::time::Duration;

use validator::Validate;

pub const DEFAULT_DEVICE_NAME: &str = "My Appliance";
pub const DEFAULT_STATUS_PATH: &str = "/cm?cmnd=status%208";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_ALERT_COUNT: u32 = 0;
pub const DEFAULT_ALERT_TEMPERATURE: f64 = -10.0;
pub const DEFAULT_HYSTERESIS: f64 = 3.0;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Upper bound for the derived request timeout.
const MAX_DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("REQUEST_TIMEOUT_SECS ({timeout}) must be shorter than POLL_INTERVAL_SECS ({interval})")]
    TimeoutTooLong { timeout: u64, interval: u64 },
}

/// Everything the poller needs to watch one appliance.
#[derive(Debug, Clone, Validate)]
pub struct MonitorConfig {
    #[validate(length(min = 1, message = "device name must not be empty"))]
    pub device_name: String,
    #[validate(length(min = 1, message = "sensor address must not be empty"))]
    pub target_address: String,
    #[validate(length(min = 1, message = "status path must not be empty"))]
    pub status_path: String,
    #[validate(range(min = 1, message = "poll interval must be at least one second"))]
    pub poll_interval_secs: u64,
    pub alert_threshold: f64,
    pub consecutive_alerts_required: u32,
    #[validate(range(min = 0.0, message = "hysteresis must not be negative"))]
    pub hysteresis_margin: f64,
    #[validate(range(min = 1, message = "request timeout must be at least one second"))]
    pub request_timeout_secs: u64,
}

impl MonitorConfig {
    /// Config with every optional value at its default.
    pub fn new(target_address: impl Into<String>) -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            target_address: target_address.into(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            alert_threshold: DEFAULT_ALERT_TEMPERATURE,
            consecutive_alerts_required: DEFAULT_ALERT_COUNT,
            hysteresis_margin: DEFAULT_HYSTERESIS,
            request_timeout_secs: default_request_timeout(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Field validation plus the cross-field timeout rule.
    pub fn check(&self) -> Result<(), ConfigError> {
        // Range checks let NaN through and infinities break the clear line.
        for (name, value) in [
            ("ALERT_TEMPERATURE", self.alert_threshold),
            ("HYSTERESIS", self.hysteresis_margin),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    name,
                    value: value.to_string(),
                });
            }
        }
        self.validate()?;
        if self.poll_interval_secs > 1 && self.request_timeout_secs >= self.poll_interval_secs {
            return Err(ConfigError::TimeoutTooLong {
                timeout: self.request_timeout_secs,
                interval: self.poll_interval_secs,
            });
        }
        Ok(())
    }
}

/// Half the poll interval, clamped to `1..=10` seconds.
pub fn default_request_timeout(poll_interval_secs: u64) -> u64 {
    (poll_interval_secs / 2).clamp(1, MAX_DEFAULT_TIMEOUT_SECS)
}

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub bind_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target_address = lookup("TH10_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("TH10_ADDRESS"))?;

        let poll_interval_secs = parse_or(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

        let monitor = MonitorConfig {
            device_name: lookup("DEVICE_NAME").unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string()),
            target_address: target_address.trim().to_string(),
            status_path: lookup("TH10_STATUS_PATH").unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string()),
            poll_interval_secs,
            alert_threshold: parse_or(&lookup, "ALERT_TEMPERATURE", DEFAULT_ALERT_TEMPERATURE)?,
            consecutive_alerts_required: parse_or(&lookup, "ALERT_COUNT", DEFAULT_ALERT_COUNT)?,
            hysteresis_margin: parse_or(&lookup, "HYSTERESIS", DEFAULT_HYSTERESIS)?,
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                default_request_timeout(poll_interval_secs),
            )?,
        };
        monitor.check()?;

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Self { monitor, bind_address })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
