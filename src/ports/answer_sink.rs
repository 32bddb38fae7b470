//! Answer sink port - persists individual questionnaire answers.
//!
//! Answers are written by the questionnaire views; aggregation never reads
//! them directly and only sees their effect through the progress source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Credential, SourceError};
use crate::domain::foundation::ProgramId;

/// Identifier of a stored answer on the backend.
pub type AnswerId = u64;

/// One answer update, by question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSubmission {
    /// Yes/no question with justification.
    YesNo {
        answer_id: AnswerId,
        justify_answer: String,
        short_answer: bool,
    },
    /// Single-choice question with justification.
    SingleChoice {
        answer_id: AnswerId,
        justify_answer: String,
        selected_choice: String,
    },
    /// Question answered by picking related Programs.
    MultipleChoice {
        answer_id: AnswerId,
        selected_programs: Vec<ProgramId>,
    },
}

impl AnswerSubmission {
    pub fn answer_id(&self) -> AnswerId {
        match self {
            AnswerSubmission::YesNo { answer_id, .. }
            | AnswerSubmission::SingleChoice { answer_id, .. }
            | AnswerSubmission::MultipleChoice { answer_id, .. } => *answer_id,
        }
    }
}

/// Port for persisting answers.
#[async_trait]
pub trait AnswerSink: Send + Sync {
    async fn save_answer(
        &self,
        submission: &AnswerSubmission,
        credential: &Credential,
    ) -> Result<(), SourceError>;
}
