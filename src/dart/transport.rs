//! HTTP transport for OpenDART JSON endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::TransportError;
use super::types::{DartApi, DartStatus};
use crate::config::Config;

/// Issues one request and returns the decoded JSON payload
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TransportError>;
}

/// `reqwest`-backed transport authenticating with a `crtfc_key`
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DartApi::BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from the configured key, timeout, user agent and base URL
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let api_key = config
            .dart_api_key
            .as_ref()
            .ok_or(TransportError::MissingApiKey)?;

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self::new(client, api_key.clone()).with_base_url(&config.base_url))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}.json", self.base_url.trim_end_matches('/'), endpoint)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TransportError> {
        let url = self.endpoint_url(endpoint);
        debug!(endpoint, ?params, "Requesting OpenDART endpoint");

        let response = self
            .client
            .get(&url)
            .query(&[(DartApi::API_KEY_PARAM, self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "OpenDART request failed");
            return Err(TransportError::Api {
                status: status.as_u16().to_string(),
                message: response_text,
            });
        }

        let payload: Value =
            serde_json::from_str(&response_text).map_err(|source| TransportError::InvalidPayload {
                endpoint: endpoint.to_string(),
                source,
            })?;

        check_status(endpoint, &payload)?;
        Ok(payload)
    }
}

/// Reject payloads whose OpenDART `status` signals an error
fn check_status(endpoint: &str, payload: &Value) -> Result<(), TransportError> {
    let status = match payload.get("status").and_then(Value::as_str) {
        Some(status) => status,
        None => return Ok(()),
    };

    if DartStatus::is_success(status) {
        return Ok(());
    }

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    warn!(endpoint, status, %message, "OpenDART returned an error status");

    Err(TransportError::Api {
        status: status.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url() {
        let transport = HttpTransport::new(Client::new(), "key").with_base_url("http://localhost:1234/api/");
        assert_eq!(transport.endpoint_url("alotMatter"), "http://localhost:1234/api/alotMatter.json");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("alotMatter", &json!({"status": "000", "list": []})).is_ok());
        assert!(check_status("alotMatter", &json!({"status": "013"})).is_ok());
        assert!(check_status("alotMatter", &json!({})).is_ok());

        let err = check_status("alotMatter", &json!({"status": "010", "message": "등록되지 않은 키입니다."}))
            .unwrap_err();
        match err {
            TransportError::Api { status, message } => {
                assert_eq!(status, "010");
                assert_eq!(message, "등록되지 않은 키입니다.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = Config {
            dart_api_key: None,
            ..Config::default()
        };
        assert!(matches!(
            HttpTransport::from_config(&config),
            Err(TransportError::MissingApiKey)
        ));
    }
}
