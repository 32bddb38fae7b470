//! ProgressAggregator - fetches progress for a selection and aggregates it.
//!
//! Fetches for distinct Programs are independent and run concurrently up to
//! a configured limit. The aggregator waits for all of them before producing
//! metrics. Accumulation is local to each call.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::catalog::ProgramPlacement;
use crate::domain::progress::{aggregate, AggregateMetrics, ProgramProgress, ProgressOutcome};
use crate::ports::{Credential, ProgressSource};

/// Default bound on in-flight progress fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Fan-out / fan-in progress aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressAggregator {
    max_concurrent_fetches: usize,
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_FETCHES)
    }
}

impl ProgressAggregator {
    /// Creates an aggregator; a limit of zero is raised to one.
    pub fn new(max_concurrent_fetches: usize) -> Self {
        Self {
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }

    /// Computes metrics for `selection`.
    ///
    /// Per-Program fetch failures never propagate; they degrade the result.
    pub async fn compute_metrics(
        &self,
        selection: &[ProgramPlacement],
        source: &dyn ProgressSource,
        credential: &Credential,
    ) -> AggregateMetrics {
        let progress = self.fetch_all(selection, source, credential).await;
        let metrics = aggregate(&progress);
        debug!(
            selected = selection.len(),
            percent = metrics.percent_complete.value(),
            remaining_questions = metrics.remaining_questions,
            degraded = metrics.is_degraded(),
            "metrics computed"
        );
        metrics
    }

    /// Fetches progress for every placement, sorted by Program id.
    pub async fn fetch_all(
        &self,
        selection: &[ProgramPlacement],
        source: &dyn ProgressSource,
        credential: &Credential,
    ) -> Vec<ProgramProgress> {
        let mut progress: Vec<ProgramProgress> = stream::iter(selection.iter().copied())
            .map(|placement| fetch_one(placement, source, credential))
            .buffer_unordered(self.max_concurrent_fetches)
            .collect()
            .await;

        progress.sort_by_key(|p| p.placement.program_id);
        progress
    }
}

async fn fetch_one(
    placement: ProgramPlacement,
    source: &dyn ProgressSource,
    credential: &Credential,
) -> ProgramProgress {
    let program_id = placement.program_id;
    let outcome = match source.fetch_progress(program_id, credential).await {
        Ok(record) if record.program_id() == program_id => ProgressOutcome::Fetched(record),
        Ok(record) => {
            warn!(
                %program_id,
                returned = %record.program_id(),
                "progress source returned a record for another program"
            );
            ProgressOutcome::failed(format!(
                "record for program {} returned instead",
                record.program_id()
            ))
        }
        Err(e) => {
            warn!(%program_id, error = %e, "progress fetch failed");
            ProgressOutcome::failed(e.to_string())
        }
    };
    ProgramProgress::new(placement, outcome)
}
