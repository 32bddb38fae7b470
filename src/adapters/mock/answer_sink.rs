//! Mock answer sink recording every submission.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{AnswerSink, AnswerSubmission, Credential, SourceError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct MockAnswerSink {
    saved: Arc<Mutex<Vec<AnswerSubmission>>>,
    error: Option<SourceError>,
}

impl MockAnswerSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every save with `error`.
    pub fn with_error(mut self, error: SourceError) -> Self {
        self.error = Some(error);
        self
    }

    /// Submissions accepted so far.
    pub fn saved(&self) -> Vec<AnswerSubmission> {
        lock(&self.saved).clone()
    }
}

#[async_trait]
impl AnswerSink for MockAnswerSink {
    async fn save_answer(
        &self,
        submission: &AnswerSubmission,
        _credential: &Credential,
    ) -> Result<(), SourceError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        lock(&self.saved).push(submission.clone());
        Ok(())
    }
}
