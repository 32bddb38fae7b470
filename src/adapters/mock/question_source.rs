//! Mock question source serving configured questions and answers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::ProgramId;
use crate::ports::{
    Credential, Question, QuestionId, QuestionKind, QuestionSource, SourceError, StoredAnswer,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock question source.
///
/// Programs and questions without configured data read as empty, like an
/// unsuccessful backend response.
#[derive(Debug, Clone, Default)]
pub struct MockQuestionSource {
    questions: HashMap<(ProgramId, QuestionKind), Vec<Question>>,
    answers: HashMap<QuestionId, StoredAnswer>,
    error: Option<SourceError>,
    calls: Arc<Mutex<usize>>,
}

impl MockQuestionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `question` under its own Program and kind.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions
            .entry((question.program_id, question.kind))
            .or_default()
            .push(question);
        self
    }

    pub fn with_answer(mut self, answer: StoredAnswer) -> Self {
        self.answers.insert(answer.question_id, answer);
        self
    }

    /// Fails every read with `error`.
    pub fn with_error(mut self, error: SourceError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }

    fn record_call(&self) -> Result<(), SourceError> {
        *lock(&self.calls) += 1;
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QuestionSource for MockQuestionSource {
    async fn fetch_questions(
        &self,
        program_id: ProgramId,
        kind: QuestionKind,
        _credential: &Credential,
    ) -> Result<Vec<Question>, SourceError> {
        self.record_call()?;
        Ok(self
            .questions
            .get(&(program_id, kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_answer(
        &self,
        question_id: QuestionId,
        _credential: &Credential,
    ) -> Result<Option<StoredAnswer>, SourceError> {
        self.record_call()?;
        Ok(self.answers.get(&question_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AnswerValue;

    fn question(id: QuestionId, program: u64, kind: QuestionKind) -> Question {
        Question {
            id,
            program_id: ProgramId::new(program),
            kind,
            title: format!("Question {id}"),
            description: None,
        }
    }

    fn credential() -> Credential {
        Credential::new("t")
    }

    #[tokio::test]
    async fn questions_are_keyed_by_program_and_kind() {
        let source = MockQuestionSource::new()
            .with_question(question(1, 4, QuestionKind::NationalFramework))
            .with_question(question(2, 4, QuestionKind::NationalFramework))
            .with_question(question(3, 4, QuestionKind::Evolution))
            .with_question(question(4, 5, QuestionKind::NationalFramework));

        let questions = source
            .fetch_questions(ProgramId::new(4), QuestionKind::NationalFramework, &credential())
            .await
            .unwrap();

        let ids: Vec<_> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn missing_data_reads_as_empty() {
        let source = MockQuestionSource::new();

        let questions = source
            .fetch_questions(ProgramId::new(9), QuestionKind::Linkages, &credential())
            .await
            .unwrap();
        let answer = source.fetch_answer(12, &credential()).await.unwrap();

        assert!(questions.is_empty());
        assert_eq!(answer, None);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn serves_configured_answer() {
        let stored = StoredAnswer {
            id: 30,
            question_id: 3,
            value: AnswerValue::SingleChoice {
                selected_choice: Some("CAPABLE".to_string()),
                justify_answer: "Staffed team".to_string(),
            },
        };
        let source = MockQuestionSource::new().with_answer(stored.clone());

        assert_eq!(source.fetch_answer(3, &credential()).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn injected_error_fails_reads() {
        let source = MockQuestionSource::new().with_error(SourceError::Unauthorized);

        let result = source.fetch_answer(3, &credential()).await;

        assert_eq!(result, Err(SourceError::Unauthorized));
    }
}
