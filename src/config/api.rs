//! Backend API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::http::EpicApiConfig;
use crate::ports::Credential;

/// Epic backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token sent as `Authorization: Token <token>`
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credential built from the configured token, if any
    pub fn credential(&self) -> Option<Credential> {
        self.token
            .as_ref()
            .map(|t| t.expose_secret().as_str())
            .filter(|t| !t.is_empty())
            .map(Credential::new)
    }

    /// Client configuration for the HTTP adapter
    pub fn client_config(&self) -> EpicApiConfig {
        EpicApiConfig::new(self.base_url.clone()).with_timeout(self.timeout())
    }

    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.credential().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = ApiConfig {
            base_url: "ftp://epic.local".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_rejects_timeout_out_of_range() {
        for timeout_secs in [0, 301] {
            let config = ApiConfig {
                timeout_secs,
                ..ApiConfig::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }
    }

    #[test]
    fn test_empty_token_yields_no_credential() {
        let config = ApiConfig {
            token: Some(SecretString::new(String::new())),
            ..ApiConfig::default()
        };
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_client_config_carries_timeout() {
        let config = ApiConfig {
            base_url: "https://epic.example.org/".to_string(),
            timeout_secs: 5,
            ..ApiConfig::default()
        };
        let client = config.client_config();
        assert_eq!(client.base_url, "https://epic.example.org");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }
}
