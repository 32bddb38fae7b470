//! Application layer - orchestrates the domain through the ports.
//!
//! - `ProgressAggregator` - concurrent progress fetch and aggregation
//! - `Store` - the owned state facade with the stale-result guard

mod aggregator;
mod errors;
mod store;

pub use aggregator::{ProgressAggregator, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use errors::StoreError;
pub use store::{MetricsApplication, MetricsRequest, PendingMetrics, StaleReason, Store};
