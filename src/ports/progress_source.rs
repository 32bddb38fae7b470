//! Progress source port - per-Program completion snapshots.

use async_trait::async_trait;

use super::{Credential, SourceError};
use crate::domain::foundation::ProgramId;
use crate::domain::progress::ProgressRecord;

/// Port for fetching one Program's progress.
///
/// Implementations own their request timeout policy; the aggregator waits
/// for every outstanding fetch.
#[async_trait]
pub trait ProgressSource: Send + Sync {
    async fn fetch_progress(
        &self,
        program_id: ProgramId,
        credential: &Credential,
    ) -> Result<ProgressRecord, SourceError>;
}
