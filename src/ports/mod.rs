//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TreeSource` - raw Area → Group → Program tree
//! - `AgencySource` - agencies for bulk selection
//! - `ProgressSource` - per-Program progress snapshots
//! - `QuestionSource` - questions per Program and their stored answers
//! - `AnswerSink` - persists individual answers

mod answer_sink;
mod catalog_source;
mod progress_source;
mod question_source;
mod source_error;

pub use answer_sink::{AnswerId, AnswerSink, AnswerSubmission};
pub use catalog_source::{AgencySource, TreeSource};
pub use progress_source::ProgressSource;
pub use question_source::{
    AnswerValue, Question, QuestionId, QuestionKind, QuestionSource, StoredAnswer,
};
pub use source_error::{Credential, SourceError};
