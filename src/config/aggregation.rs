//! Progress aggregation configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::{ProgressAggregator, DEFAULT_MAX_CONCURRENT_FETCHES};

const MAX_CONCURRENT_FETCHES_LIMIT: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Upper bound on progress fetches in flight at once
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl AggregationConfig {
    pub fn aggregator(&self) -> ProgressAggregator {
        ProgressAggregator::new(self.max_concurrent_fetches)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_fetches == 0
            || self.max_concurrent_fetches > MAX_CONCURRENT_FETCHES_LIMIT
        {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}
