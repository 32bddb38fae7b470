//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - REST client for the Epic backend
//! - `mock` - in-memory ports for tests and offline runs

pub mod http;
pub mod mock;

pub use http::{EpicApiClient, EpicApiConfig};
pub use mock::{
    MockAgencySource, MockAnswerSink, MockProgressSource, MockQuestionSource, MockTreeSource,
};
