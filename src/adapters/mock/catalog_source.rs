//! Mock tree and agency sources for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::catalog::RawArea;
use crate::domain::foundation::ScopeId;
use crate::domain::selection::Agency;
use crate::ports::{AgencySource, Credential, SourceError, TreeSource};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock tree source returning a configurable raw tree.
///
/// Clones share state so a test can swap the tree between loads.
#[derive(Debug, Clone)]
pub struct MockTreeSource {
    response: Arc<Mutex<Result<Vec<RawArea>, SourceError>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<ScopeId>>>,
}

impl Default for MockTreeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTreeSource {
    /// Creates a source that serves an empty tree.
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(Vec::new()))),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_tree(self, tree: Vec<RawArea>) -> Self {
        self.set_tree(tree);
        self
    }

    pub fn with_error(self, error: SourceError) -> Self {
        *lock(&self.response) = Err(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the tree served by this source and its clones.
    pub fn set_tree(&self, tree: Vec<RawArea>) {
        *lock(&self.response) = Ok(tree);
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Scopes requested so far.
    pub fn calls(&self) -> Vec<ScopeId> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl TreeSource for MockTreeSource {
    async fn fetch_tree(
        &self,
        scope: &ScopeId,
        _credential: &Credential,
    ) -> Result<Vec<RawArea>, SourceError> {
        lock(&self.calls).push(scope.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        lock(&self.response).clone()
    }
}

/// Mock agency source.
#[derive(Debug, Clone)]
pub struct MockAgencySource {
    response: Arc<Mutex<Result<Vec<Agency>, SourceError>>>,
}

impl Default for MockAgencySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAgencySource {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(Vec::new()))),
        }
    }

    pub fn with_agency(self, agency: Agency) -> Self {
        if let Ok(agencies) = lock(&self.response).as_mut() {
            agencies.push(agency);
        }
        self
    }

    pub fn with_error(self, error: SourceError) -> Self {
        *lock(&self.response) = Err(error);
        self
    }
}

#[async_trait]
impl AgencySource for MockAgencySource {
    async fn fetch_agencies(&self, _credential: &Credential) -> Result<Vec<Agency>, SourceError> {
        lock(&self.response).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{RawGroup, RawProgram};
    use crate::domain::foundation::{AgencyId, ProgramId};

    fn credential() -> Credential {
        Credential::new("token")
    }

    fn scope() -> ScopeId {
        ScopeId::new("epic-2024").unwrap()
    }

    #[tokio::test]
    async fn serves_empty_tree_by_default() {
        let source = MockTreeSource::new();

        let tree = source.fetch_tree(&scope(), &credential()).await.unwrap();

        assert!(tree.is_empty());
        assert_eq!(source.calls(), vec![scope()]);
    }

    #[tokio::test]
    async fn serves_replaced_tree_to_clones() {
        let source = MockTreeSource::new();
        let handle = source.clone();
        handle.set_tree(vec![RawArea::new(
            1,
            "Governance",
            vec![RawGroup::new(1, "Finance", vec![RawProgram::new(1, "Budget")])],
        )]);

        let tree = source.fetch_tree(&scope(), &credential()).await.unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(handle.call_count(), 1);
    }

    #[tokio::test]
    async fn tree_error_is_returned() {
        let source = MockTreeSource::new().with_error(SourceError::not_available("down"));

        let result = source.fetch_tree(&scope(), &credential()).await;

        assert!(matches!(result, Err(SourceError::NotAvailable { .. })));
    }

    #[tokio::test]
    async fn serves_agencies() {
        let source = MockAgencySource::new().with_agency(Agency::new(
            AgencyId::new(3),
            "Ministry of Finance",
            vec![ProgramId::new(1)],
        ));

        let agencies = source.fetch_agencies(&credential()).await.unwrap();

        assert_eq!(agencies.len(), 1);
        assert_eq!(agencies[0].id(), AgencyId::new(3));
    }
}
