//! Catalog-specific error types.

use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{AreaId, DomainError, ErrorCode, GroupId};

/// Level of the Area → Group → Program hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeLevel {
    Area,
    Group,
    Program,
}

impl fmt::Display for TreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TreeLevel::Area => "area",
            TreeLevel::Group => "group",
            TreeLevel::Program => "program",
        };
        write!(f, "{}", s)
    }
}

/// Structural violation found while normalizing a raw tree.
///
/// A load that fails with this error never replaces the previously loaded tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTreeError {
    #[error("{level} at {location} has no identifier")]
    MissingIdentifier { level: TreeLevel, location: String },

    #[error("duplicate {level} identifier {id}")]
    DuplicateIdentifier { level: TreeLevel, id: u64 },

    #[error("group {group} references area {referenced} but is nested under area {parent}")]
    DanglingReference {
        group: GroupId,
        referenced: AreaId,
        parent: AreaId,
    },
}

impl MalformedTreeError {
    pub fn missing_identifier(level: TreeLevel, location: impl Into<String>) -> Self {
        MalformedTreeError::MissingIdentifier {
            level,
            location: location.into(),
        }
    }

    pub fn duplicate(level: TreeLevel, id: u64) -> Self {
        MalformedTreeError::DuplicateIdentifier { level, id }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::MalformedTree
    }
}

impl From<MalformedTreeError> for DomainError {
    fn from(err: MalformedTreeError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_identifier_displays_level_and_id() {
        let err = MalformedTreeError::duplicate(TreeLevel::Program, 7);
        assert_eq!(err.to_string(), "duplicate program identifier 7");
    }

    #[test]
    fn missing_identifier_displays_location() {
        let err = MalformedTreeError::missing_identifier(TreeLevel::Group, "area 2, position 0");
        assert_eq!(err.to_string(), "group at area 2, position 0 has no identifier");
    }

    #[test]
    fn converts_to_malformed_tree_domain_error() {
        let err: DomainError = MalformedTreeError::duplicate(TreeLevel::Area, 1).into();
        assert_eq!(err.code, ErrorCode::MalformedTree);
    }
}
