//! Catalog source ports - where the tree and agencies come from.

use async_trait::async_trait;

use super::{Credential, SourceError};
use crate::domain::catalog::RawArea;
use crate::domain::foundation::ScopeId;
use crate::domain::selection::Agency;

/// Port for fetching the raw Area → Group → Program tree.
#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Fetch the raw tree for a scope.
    ///
    /// An unsuccessful response that still reached the source is reported as
    /// an empty tree ("no data"). Transport failures are errors.
    async fn fetch_tree(
        &self,
        scope: &ScopeId,
        credential: &Credential,
    ) -> Result<Vec<RawArea>, SourceError>;
}

/// Port for fetching the agencies available for bulk selection.
#[async_trait]
pub trait AgencySource: Send + Sync {
    async fn fetch_agencies(&self, credential: &Credential) -> Result<Vec<Agency>, SourceError>;
}
