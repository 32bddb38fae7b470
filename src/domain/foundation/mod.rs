//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the progress tracking domain.

mod errors;
mod ids;
mod percentage;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AgencyId, AreaId, GroupId, ProgramId, ScopeId};
pub use percentage::Percentage;
