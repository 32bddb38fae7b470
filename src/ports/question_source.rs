//! Question source port - questionnaire questions and their stored answers.
//!
//! Each Program carries questions of several kinds. Reads follow the same
//! "no data" convention as the catalog sources: an unsuccessful response
//! that still reached the source yields an empty result, while transport
//! failures are errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnswerId, Credential, SourceError};
use crate::domain::foundation::ProgramId;

/// Identifier of a question on the backend.
pub type QuestionId = u64;

/// The questionnaire a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Yes/no with justification.
    NationalFramework,
    /// One of four maturity levels with justification.
    Evolution,
    /// Related Programs picked from the whole tree.
    Linkages,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 3] = [
        QuestionKind::NationalFramework,
        QuestionKind::Evolution,
        QuestionKind::Linkages,
    ];

    /// Name used in the `question-{name}` path of a Program's questions.
    pub fn path_segment(self) -> &'static str {
        match self {
            QuestionKind::NationalFramework => "nationalframework",
            QuestionKind::Evolution => "evolution",
            QuestionKind::Linkages => "linkages",
        }
    }
}

/// One question attached to a Program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub program_id: ProgramId,
    pub kind: QuestionKind,
    pub title: String,
    pub description: Option<String>,
}

/// The content of a stored answer, by question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerValue {
    /// `None` until the user picks yes or no.
    YesNo {
        short_answer: Option<bool>,
        justify_answer: String,
    },
    SingleChoice {
        selected_choice: Option<String>,
        justify_answer: String,
    },
    MultipleChoice { selected_programs: Vec<ProgramId> },
}

/// An answer as the backend currently stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

/// Port for reading questions and the current user's answers to them.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Questions of `kind` for `program_id`; empty when the source has none.
    async fn fetch_questions(
        &self,
        program_id: ProgramId,
        kind: QuestionKind,
        credential: &Credential,
    ) -> Result<Vec<Question>, SourceError>;

    /// The stored answer to `question_id`, or `None` when there is none.
    async fn fetch_answer(
        &self,
        question_id: QuestionId,
        credential: &Credential,
    ) -> Result<Option<StoredAnswer>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_segments_match_backend_routes() {
        let segments: Vec<_> = QuestionKind::ALL.iter().map(|k| k.path_segment()).collect();
        assert_eq!(segments, vec!["nationalframework", "evolution", "linkages"]);
    }

    #[test]
    fn stored_answer_serializes_kind_tag() {
        let answer = StoredAnswer {
            id: 3,
            question_id: 8,
            value: AnswerValue::YesNo {
                short_answer: Some(true),
                justify_answer: "Reviewed".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&answer).unwrap(),
            json!({
                "id": 3,
                "question_id": 8,
                "value": {"kind": "yes_no", "short_answer": true, "justify_answer": "Reviewed"}
            })
        );
    }
}
