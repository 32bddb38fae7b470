//! Progress module - per-Program snapshots and their aggregation.

mod metrics;
mod record;

pub use metrics::{aggregate, AggregateMetrics, QUESTIONS_PER_TIME_UNIT};
pub use record::{ProgramProgress, ProgressOutcome, ProgressRecord};
