//! Mock progress source for testing.
//!
//! Provides a configurable in-memory implementation of the ProgressSource
//! port so aggregation and store tests run without a backend.
//!
//! # Features
//!
//! - Per-Program records or errors
//! - Simulated delays, globally or per Program
//! - Call tracking and peak concurrency for verification
//!
//! # Example
//!
//! ```ignore
//! let source = MockProgressSource::new()
//!     .with_record(record)
//!     .with_delay(Duration::from_millis(50));
//!
//! let fetched = source.fetch_progress(record.program_id(), &credential).await?;
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ProgramId;
use crate::domain::progress::ProgressRecord;
use crate::ports::{Credential, ProgressSource, SourceError};

type Responses = HashMap<ProgramId, Result<ProgressRecord, SourceError>>;

/// Mock progress source.
///
/// Clones share state, so a test can keep a handle and change responses
/// while the store holds another.
#[derive(Debug, Clone, Default)]
pub struct MockProgressSource {
    responses: Arc<Mutex<Responses>>,
    delays: Arc<Mutex<HashMap<ProgramId, Duration>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<ProgramId>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProgressSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responds with `record` for its own Program.
    pub fn with_record(self, record: ProgressRecord) -> Self {
        self.set_record(record);
        self
    }

    /// Responds with `record` when `program_id` is requested.
    pub fn with_record_for(self, program_id: ProgramId, record: ProgressRecord) -> Self {
        lock(&self.responses).insert(program_id, Ok(record));
        self
    }

    /// Fails fetches for `program_id`.
    pub fn with_error(self, program_id: ProgramId, error: SourceError) -> Self {
        lock(&self.responses).insert(program_id, Err(error));
        self
    }

    /// Sets simulated latency for every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets simulated latency for one Program, overriding the global delay.
    pub fn with_delay_for(self, program_id: ProgramId, delay: Duration) -> Self {
        lock(&self.delays).insert(program_id, delay);
        self
    }

    /// Replaces the response for the record's Program.
    pub fn set_record(&self, record: ProgressRecord) {
        lock(&self.responses).insert(record.program_id(), Ok(record));
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Programs requested so far, in request order.
    pub fn calls(&self) -> Vec<ProgramId> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Highest number of fetches observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn delay_for(&self, program_id: ProgramId) -> Duration {
        lock(&self.delays)
            .get(&program_id)
            .copied()
            .unwrap_or(self.delay)
    }
}

#[async_trait]
impl ProgressSource for MockProgressSource {
    async fn fetch_progress(
        &self,
        program_id: ProgramId,
        _credential: &Credential,
    ) -> Result<ProgressRecord, SourceError> {
        lock(&self.calls).push(program_id);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delay_for(program_id);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        lock(&self.responses)
            .get(&program_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(SourceError::not_available(format!(
                    "no progress configured for program {}",
                    program_id
                )))
            })
    }
}
