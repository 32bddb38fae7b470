//! In-memory adapters for tests and offline runs.
//!
//! - `MockTreeSource` / `MockAgencySource` - configurable catalog data
//! - `MockProgressSource` - per-Program records, delays, error injection
//! - `MockQuestionSource` - questions and stored answers by key
//! - `MockAnswerSink` - records submitted answers

mod answer_sink;
mod catalog_source;
mod progress_source;
mod question_source;

pub use answer_sink::MockAnswerSink;
pub use catalog_source::{MockAgencySource, MockTreeSource};
pub use progress_source::MockProgressSource;
pub use question_source::MockQuestionSource;
