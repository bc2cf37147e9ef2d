//! Centralized configuration management for opendart

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

use crate::dart::DartApi;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenDART API key (`crtfc_key`)
    pub dart_api_key: Option<String>,
    /// API root, without trailing endpoint names
    pub base_url: String,
    /// Log file written by the CLI
    pub log_file: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dart_api_key: None,
            base_url: DartApi::BASE_URL.to_string(),
            log_file: PathBuf::from("opendart.log"),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let dart_api_key = std::env::var("DART_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let base_url = std::env::var("OPENDART_BASE_URL").unwrap_or(defaults.base_url);

        let log_file = std::env::var("OPENDART_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let http = HttpConfig {
            timeout_seconds: parse_env_var("OPENDART_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: std::env::var("OPENDART_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            dart_api_key,
            base_url,
            log_file,
            http,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dart_api_key.is_none() {
            return Err(anyhow::anyhow!(
                "OpenDART API key not configured. Set DART_API_KEY environment variable"
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("Invalid OpenDART base URL: {}", self.base_url));
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least one second"));
        }

        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("opendart/{}", env!("CARGO_PKG_VERSION"))
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://opendart.fss.or.kr/api");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.http.user_agent.starts_with("opendart/"));
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            dart_api_key: Some("0123456789abcdef".to_string()),
            ..Config::default()
        };
        config.validate().unwrap();

        let config = Config {
            dart_api_key: Some("0123456789abcdef".to_string()),
            base_url: "opendart.fss.or.kr/api".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_var_reports_bad_values() {
        std::env::set_var("OPENDART_TEST_BAD_TIMEOUT", "soon");
        let result: Result<Option<u64>> = parse_env_var("OPENDART_TEST_BAD_TIMEOUT");
        assert!(result.is_err());

        std::env::set_var("OPENDART_TEST_GOOD_TIMEOUT", "45");
        let result: Option<u64> = parse_env_var("OPENDART_TEST_GOOD_TIMEOUT").unwrap();
        assert_eq!(result, Some(45));

        let result: Option<u64> = parse_env_var("OPENDART_TEST_UNSET_VARIABLE").unwrap();
        assert_eq!(result, None);
    }
}
