//! ProgressRecord value object - one Program's completion snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::ProgramPlacement;
use crate::domain::foundation::{ProgramId, ValidationError};

/// Snapshot of one Program's progress, fetched on demand.
///
/// `fraction`, `unanswered_count`, and `total_questions` always come from
/// the same fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    program_id: ProgramId,
    fraction: f64,
    unanswered_count: u32,
    total_questions: Option<u32>,
}

impl ProgressRecord {
    /// Creates a validated record.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `fraction` is not a finite value in `[0, 1]`
    /// - `OutOfRange` if `unanswered_count` exceeds a known `total_questions`
    pub fn new(
        program_id: ProgramId,
        fraction: f64,
        unanswered_count: u32,
        total_questions: Option<u32>,
    ) -> Result<Self, ValidationError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::out_of_range("fraction", 0.0, 1.0, fraction));
        }
        if let Some(total) = total_questions {
            if unanswered_count > total {
                return Err(ValidationError::out_of_range(
                    "unanswered_count",
                    0.0,
                    f64::from(total),
                    f64::from(unanswered_count),
                ));
            }
        }
        Ok(Self {
            program_id,
            fraction,
            unanswered_count,
            total_questions,
        })
    }

    pub fn program_id(&self) -> ProgramId {
        self.program_id
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn unanswered_count(&self) -> u32 {
        self.unanswered_count
    }

    pub fn total_questions(&self) -> Option<u32> {
        self.total_questions
    }

    /// Complete means exactly 1, not a threshold.
    #[allow(clippy::float_cmp)]
    pub fn is_complete(&self) -> bool {
        self.fraction == 1.0
    }

    /// Questions still to answer according to this snapshot.
    ///
    /// Uses `(1 - fraction) × total` when the total is known, otherwise the
    /// reported unanswered count.
    pub fn remaining_questions(&self) -> f64 {
        match self.total_questions {
            Some(total) => (1.0 - self.fraction) * f64::from(total),
            None => f64::from(self.unanswered_count),
        }
    }
}

/// Result of fetching one Program's progress.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressOutcome {
    Fetched(ProgressRecord),
    Failed { reason: String },
}

impl ProgressOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        ProgressOutcome::Failed {
            reason: reason.into(),
        }
    }
}

/// A selected Program paired with the outcome of its progress fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramProgress {
    pub placement: ProgramPlacement,
    pub outcome: ProgressOutcome,
}

impl ProgramProgress {
    pub fn new(placement: ProgramPlacement, outcome: ProgressOutcome) -> Self {
        Self { placement, outcome }
    }

    /// Fraction this Program contributes to the mean; failures contribute 0.
    pub fn fraction(&self) -> f64 {
        match &self.outcome {
            ProgressOutcome::Fetched(record) => record.fraction(),
            ProgressOutcome::Failed { .. } => 0.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(&self.outcome, ProgressOutcome::Fetched(record) if record.is_complete())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ProgressOutcome::Failed { .. })
    }

    /// Remaining questions contributed by this Program.
    ///
    /// A failed fetch contributes the Program's full question count when the
    /// catalog knows it, and nothing otherwise.
    pub fn remaining_questions(&self) -> f64 {
        match &self.outcome {
            ProgressOutcome::Fetched(record) => record.remaining_questions(),
            ProgressOutcome::Failed { .. } => {
                self.placement.question_count.map(f64::from).unwrap_or(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AreaId, GroupId};

    fn pid(id: u64) -> ProgramId {
        ProgramId::new(id)
    }

    fn placement(question_count: Option<u32>) -> ProgramPlacement {
        ProgramPlacement {
            program_id: pid(1),
            group_id: GroupId::new(1),
            area_id: AreaId::new(1),
            question_count,
        }
    }

    #[test]
    fn rejects_fraction_outside_unit_interval() {
        assert!(ProgressRecord::new(pid(1), 1.01, 0, None).is_err());
        assert!(ProgressRecord::new(pid(1), -0.1, 0, None).is_err());
        assert!(ProgressRecord::new(pid(1), f64::NAN, 0, None).is_err());
    }

    #[test]
    fn rejects_more_unanswered_than_total() {
        assert!(ProgressRecord::new(pid(1), 0.0, 9, Some(8)).is_err());
        assert!(ProgressRecord::new(pid(1), 0.0, 8, Some(8)).is_ok());
    }

    #[test]
    fn completion_requires_exactly_one() {
        assert!(ProgressRecord::new(pid(1), 1.0, 0, None).unwrap().is_complete());
        assert!(!ProgressRecord::new(pid(1), 0.999_999, 0, None)
            .unwrap()
            .is_complete());
    }

    #[test]
    fn remaining_uses_total_from_same_snapshot() {
        let record = ProgressRecord::new(pid(1), 0.5, 4, Some(8)).unwrap();
        assert!((record.remaining_questions() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn remaining_falls_back_to_unanswered_count() {
        let record = ProgressRecord::new(pid(1), 0.25, 6, None).unwrap();
        assert!((record.remaining_questions() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_fetch_uses_catalog_question_count_when_known() {
        let known = ProgramProgress::new(placement(Some(10)), ProgressOutcome::failed("timeout"));
        let unknown = ProgramProgress::new(placement(None), ProgressOutcome::failed("timeout"));

        assert!((known.remaining_questions() - 10.0).abs() < f64::EPSILON);
        assert!(unknown.remaining_questions().abs() < f64::EPSILON);
        assert!(known.fraction().abs() < f64::EPSILON);
        assert!(!known.is_complete());
        assert!(known.is_failed());
    }
}
