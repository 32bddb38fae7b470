//! Errors and credentials shared by collaborator ports.

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Opaque credential forwarded to collaborators (e.g. an API token).
#[derive(Debug, Clone)]
pub struct Credential(Secret<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    /// Exposes the raw token (for building requests).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Failure reported by a tree, agency, progress, or answer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The collaborator could not be reached or did not answer.
    #[error("not available: {message}")]
    NotAvailable { message: String },

    /// The credential was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The collaborator answered with a status the caller cannot use.
    #[error("request rejected with status {status}")]
    Rejected { status: u16 },

    /// The response could not be decoded into the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl SourceError {
    pub fn not_available(message: impl Into<String>) -> Self {
        SourceError::NotAvailable {
            message: message.into(),
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        SourceError::InvalidPayload(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SourceError::NotAvailable { .. } | SourceError::Rejected { .. } => {
                ErrorCode::NotAvailable
            }
            SourceError::Unauthorized => ErrorCode::Unauthorized,
            SourceError::InvalidPayload(_) => ErrorCode::InvalidPayload,
        }
    }
}

impl From<SourceError> for DomainError {
    fn from(err: SourceError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_does_not_leak_token() {
        let credential = Credential::new("s3cr3t");
        assert!(!format!("{:?}", credential).contains("s3cr3t"));
        assert_eq!(credential.expose(), "s3cr3t");
    }

    #[test]
    fn source_error_codes() {
        assert_eq!(SourceError::not_available("down").code(), ErrorCode::NotAvailable);
        assert_eq!(SourceError::Rejected { status: 500 }.code(), ErrorCode::NotAvailable);
        assert_eq!(SourceError::Unauthorized.code(), ErrorCode::Unauthorized);
        assert_eq!(
            SourceError::invalid_payload("bad json").code(),
            ErrorCode::InvalidPayload
        );
    }

    #[test]
    fn source_error_display() {
        assert_eq!(
            SourceError::not_available("connection refused").to_string(),
            "not available: connection refused"
        );
    }
}
