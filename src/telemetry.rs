//! Tracing subscriber setup for the binary.
//!
//! `RUST_LOG` wins over the configured filter when set. Output goes to
//! stderr so stdout stays free for command results.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::TelemetryConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("tracing already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Builds the filter from `RUST_LOG`, falling back to `config.log_level`.
///
/// A set but malformed `RUST_LOG` is an error, not a fallback.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(rust_log.as_deref(), config)
}

fn filter_from(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<EnvFilter, TelemetryError> {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => Ok(EnvFilter::try_new(directives)?),
        None => Ok(EnvFilter::try_new(&config.log_level)?),
    }
}

/// Installs the global subscriber. Call once at startup.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_is_used_without_rust_log() {
        let filter = filter_from(None, &TelemetryConfig::default()).unwrap();
        assert!(filter.to_string().contains("epic_tracker=debug"));
    }

    #[test]
    fn blank_rust_log_counts_as_unset() {
        let filter = filter_from(Some("  "), &TelemetryConfig::default()).unwrap();
        assert!(filter.to_string().contains("epic_tracker=debug"));
    }

    #[test]
    fn rust_log_overrides_configured_filter() {
        let filter = filter_from(Some("warn"), &TelemetryConfig::default()).unwrap();
        assert!(!filter.to_string().contains("epic_tracker=debug"));
    }

    #[test]
    fn malformed_rust_log_is_rejected() {
        let result = filter_from(Some("epic_tracker=verbose"), &TelemetryConfig::default());
        assert!(matches!(result, Err(TelemetryError::InvalidFilter(_))));
    }
}
