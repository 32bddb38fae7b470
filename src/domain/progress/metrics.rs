//! AggregateMetrics - overall completion derived from per-Program progress.
//!
//! Metrics are always recomputed from scratch from one consistent batch of
//! [`ProgramProgress`] values. Nothing is patched incrementally.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::record::ProgramProgress;
use crate::domain::foundation::{AreaId, GroupId, Percentage, ProgramId};

/// Questions answered per unit of time (the unit is defined by the caller).
pub const QUESTIONS_PER_TIME_UNIT: u32 = 3;

/// Derived completion summary for a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub percent_complete: Percentage,
    pub remaining_questions: u32,
    pub remaining_time_estimate: u32,
    pub incomplete_groups: BTreeSet<GroupId>,
    pub incomplete_areas: BTreeSet<AreaId>,
    pub completed_programs: BTreeSet<ProgramId>,
    /// Programs whose progress could not be fetched.
    pub failed_programs: BTreeSet<ProgramId>,
}

impl AggregateMetrics {
    /// Metrics for an empty selection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when at least one fetch failed and the figures are partial.
    pub fn is_degraded(&self) -> bool {
        !self.failed_programs.is_empty()
    }
}

/// Combines one batch of per-Program progress into metrics.
///
/// An empty batch yields [`AggregateMetrics::empty`].
pub fn aggregate(progress: &[ProgramProgress]) -> AggregateMetrics {
    if progress.is_empty() {
        return AggregateMetrics::empty();
    }

    let mut metrics = AggregateMetrics::empty();
    let mut fraction_sum = 0.0;
    let mut remaining = 0.0;

    for entry in progress {
        let program_id = entry.placement.program_id;
        fraction_sum += entry.fraction();

        if entry.is_failed() {
            metrics.failed_programs.insert(program_id);
        }

        if entry.is_complete() {
            metrics.completed_programs.insert(program_id);
        } else {
            remaining += entry.remaining_questions();
            metrics.incomplete_groups.insert(entry.placement.group_id);
            metrics.incomplete_areas.insert(entry.placement.area_id);
        }
    }

    metrics.percent_complete = Percentage::from_fraction(fraction_sum / progress.len() as f64);
    metrics.remaining_questions = round_to_u32(remaining);
    metrics.remaining_time_estimate = round_to_u32(
        f64::from(metrics.remaining_questions) / f64::from(QUESTIONS_PER_TIME_UNIT),
    );
    metrics
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    value.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProgramPlacement;
    use crate::domain::progress::{ProgressOutcome, ProgressRecord};

    fn placement(program: u64, group: u64, area: u64) -> ProgramPlacement {
        ProgramPlacement {
            program_id: ProgramId::new(program),
            group_id: GroupId::new(group),
            area_id: AreaId::new(area),
            question_count: None,
        }
    }

    fn fetched(
        place: ProgramPlacement,
        fraction: f64,
        unanswered: u32,
        total: Option<u32>,
    ) -> ProgramProgress {
        let record = ProgressRecord::new(place.program_id, fraction, unanswered, total).unwrap();
        ProgramProgress::new(place, ProgressOutcome::Fetched(record))
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let metrics = aggregate(&[]);
        assert_eq!(metrics.percent_complete, Percentage::ZERO);
        assert_eq!(metrics.remaining_questions, 0);
        assert_eq!(metrics.remaining_time_estimate, 0);
        assert!(metrics.incomplete_groups.is_empty());
        assert!(metrics.incomplete_areas.is_empty());
        assert!(metrics.completed_programs.is_empty());
        assert!(!metrics.is_degraded());
    }

    #[test]
    fn one_complete_one_half_done() {
        let metrics = aggregate(&[
            fetched(placement(1, 2, 2), 1.0, 0, None),
            fetched(placement(2, 1, 1), 0.5, 4, Some(8)),
        ]);

        assert_eq!(metrics.percent_complete.value(), 75);
        assert_eq!(
            metrics.completed_programs,
            BTreeSet::from([ProgramId::new(1)])
        );
        assert_eq!(metrics.remaining_questions, 4);
        assert_eq!(metrics.remaining_time_estimate, 1);
        assert_eq!(metrics.incomplete_groups, BTreeSet::from([GroupId::new(1)]));
        assert_eq!(metrics.incomplete_areas, BTreeSet::from([AreaId::new(1)]));
    }

    #[test]
    fn rounds_remaining_before_dividing_by_throughput() {
        // 0.75 × 10 + 0.5 × 3 = 9.0 → 3 time units
        let metrics = aggregate(&[
            fetched(placement(1, 1, 1), 0.25, 8, Some(10)),
            fetched(placement(2, 1, 1), 0.5, 2, Some(3)),
        ]);
        assert_eq!(metrics.remaining_questions, 9);
        assert_eq!(metrics.remaining_time_estimate, 3);
        assert_eq!(metrics.percent_complete.value(), 38);
    }

    #[test]
    fn all_complete_leaves_no_incomplete_sets() {
        let metrics = aggregate(&[
            fetched(placement(1, 1, 1), 1.0, 0, Some(5)),
            fetched(placement(2, 2, 1), 1.0, 0, Some(5)),
        ]);
        assert_eq!(metrics.percent_complete, Percentage::HUNDRED);
        assert!(metrics.incomplete_groups.is_empty());
        assert!(metrics.incomplete_areas.is_empty());
        assert_eq!(metrics.completed_programs.len(), 2);
    }

    #[test]
    fn failed_fetch_counts_as_zero_and_marks_degraded() {
        let mut failing = placement(3, 4, 2);
        failing.question_count = Some(6);

        let metrics = aggregate(&[
            fetched(placement(1, 1, 1), 1.0, 0, None),
            ProgramProgress::new(failing, ProgressOutcome::failed("unavailable")),
        ]);

        assert_eq!(metrics.percent_complete.value(), 50);
        assert_eq!(metrics.remaining_questions, 6);
        assert_eq!(metrics.remaining_time_estimate, 2);
        assert!(metrics.is_degraded());
        assert_eq!(metrics.failed_programs, BTreeSet::from([ProgramId::new(3)]));
        assert_eq!(metrics.incomplete_groups, BTreeSet::from([GroupId::new(4)]));
        assert_eq!(metrics.incomplete_areas, BTreeSet::from([AreaId::new(2)]));
    }

    #[test]
    fn failed_fetch_with_unknown_total_adds_no_questions() {
        let metrics = aggregate(&[ProgramProgress::new(
            placement(1, 1, 1),
            ProgressOutcome::failed("unavailable"),
        )]);
        assert_eq!(metrics.percent_complete, Percentage::ZERO);
        assert_eq!(metrics.remaining_questions, 0);
        assert!(metrics.is_degraded());
    }

    #[test]
    fn same_input_gives_same_metrics() {
        let batch = vec![
            fetched(placement(1, 1, 1), 0.3, 7, Some(10)),
            fetched(placement(2, 2, 1), 0.9, 1, Some(10)),
        ];
        assert_eq!(aggregate(&batch), aggregate(&batch));
    }

    #[test]
    fn round_to_u32_saturates() {
        assert_eq!(round_to_u32(-3.0), 0);
        assert_eq!(round_to_u32(f64::INFINITY), 0);
        assert_eq!(round_to_u32(2.5), 3);
        assert_eq!(round_to_u32(1e12), u32::MAX);
    }
}
