//! Application-level errors.

use thiserror::Error;

use crate::domain::catalog::MalformedTreeError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::SourceError;

/// Failure of a store operation that reaches the caller.
///
/// Per-Program fetch failures never appear here; they degrade metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("tree rejected: {0}")]
    MalformedTree(#[from] MalformedTreeError),

    #[error("tree source failed: {0}")]
    Source(#[from] SourceError),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::MalformedTree(e) => e.code(),
            StoreError::Source(e) => e.code(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedTree(e) => e.into(),
            StoreError::Source(e) => e.into(),
        }
    }
}
