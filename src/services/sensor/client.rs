use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::MonitorConfig;
use super::types::{parse_status_body, FetchError, TemperatureSource};

/// Tasmota HTTP client
/// Issues `status` commands to a TH10 and extracts the probe reading
#[derive(Clone)]
pub struct TasmotaClient {
    client: Client,
    timeout: Duration,
}

impl TasmotaClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            timeout,
        }
    }

    /// One GET against `http://{address}{path}`; no retries.
    pub async fn fetch(&self, address: &str, path: &str) -> Result<f64, FetchError> {
        let url = status_url(address, path);
        tracing::debug!("Requesting sensor status from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!(
                    "no response from {} within {}s",
                    url,
                    self.timeout.as_secs_f64()
                ))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        tracing::trace!(body = %body, "Sensor replied");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_status_body(&body)
    }
}

pub fn status_url(address: &str, path: &str) -> String {
    format!("http://{}{}", address, path)
}

/// A TH10 bound to a fixed address and status path.
pub struct TasmotaSensor {
    client: TasmotaClient,
    address: String,
    path: String,
}

impl TasmotaSensor {
    pub fn new(client: TasmotaClient, address: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            client,
            address: address.into(),
            path: path.into(),
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            TasmotaClient::new(config.request_timeout()),
            config.target_address.clone(),
            config.status_path.clone(),
        )
    }
}

#[async_trait]
impl TemperatureSource for TasmotaSensor {
    async fn fetch(&self) -> Result<f64, FetchError> {
        self.client.fetch(&self.address, &self.path).await
    }

    fn describe(&self) -> String {
        status_url(&self.address, &self.path)
    }
}
