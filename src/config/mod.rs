//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `EPIC_TRACKER` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use epic_tracker::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.base_url);
//! ```

mod aggregation;
mod api;
mod error;
mod telemetry;

pub use aggregation::AggregationConfig;
pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration pointing at a local backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend API (base URL, token, timeout)
    #[serde(default)]
    pub api: ApiConfig,

    /// Progress aggregation (fan-out bound)
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EPIC_TRACKER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EPIC_TRACKER__API__BASE_URL=https://...` -> `api.base_url = ...`
    /// - `EPIC_TRACKER__AGGREGATION__MAX_CONCURRENT_FETCHES=4`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EPIC_TRACKER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.aggregation.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
