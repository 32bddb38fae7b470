//! Store - the single owned state object views read and mutate through.
//!
//! Holds the loaded catalog, the selection, and the last published metrics.
//! Metrics are recomputed only on request, in three steps so the async
//! fetch phase never holds the store:
//!
//! 1. [`Store::begin_recompute`] snapshots the selection into a [`MetricsRequest`]
//! 2. [`MetricsRequest::run`] fetches and aggregates, yielding [`PendingMetrics`]
//! 3. [`Store::apply_metrics`] publishes the result unless it went stale
//!
//! A result is stale when the tree was reloaded after its request began, or
//! when a newer request was begun (last-request-wins).

use tracing::{debug, info};

use super::aggregator::ProgressAggregator;
use super::errors::StoreError;
use crate::domain::catalog::{normalize, Catalog, MalformedTreeError, Program, ProgramPlacement, RawArea};
use crate::domain::foundation::{AgencyId, ProgramId, ScopeId};
use crate::domain::progress::AggregateMetrics;
use crate::domain::selection::{Agency, AgencyToggle, SelectionSet};
use crate::ports::{Credential, ProgressSource, TreeSource};

/// Snapshot of the selection taken when a recomputation begins.
#[derive(Debug, Clone)]
pub struct MetricsRequest {
    request_id: u64,
    tree_generation: u64,
    placements: Vec<ProgramPlacement>,
    aggregator: ProgressAggregator,
}

impl MetricsRequest {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn tree_generation(&self) -> u64 {
        self.tree_generation
    }

    /// Programs this request covers, in ascending id order.
    pub fn placements(&self) -> &[ProgramPlacement] {
        &self.placements
    }

    /// Fetches progress for the snapshot and aggregates it.
    pub async fn run(self, source: &dyn ProgressSource, credential: &Credential) -> PendingMetrics {
        let metrics = self
            .aggregator
            .compute_metrics(&self.placements, source, credential)
            .await;

        PendingMetrics {
            request_id: self.request_id,
            tree_generation: self.tree_generation,
            metrics,
        }
    }
}

/// Metrics computed for a request but not yet published.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMetrics {
    request_id: u64,
    tree_generation: u64,
    metrics: AggregateMetrics,
}

impl PendingMetrics {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn metrics(&self) -> &AggregateMetrics {
        &self.metrics
    }
}

/// Why a computed result was not published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The tree was reloaded after the request began.
    TreeReloaded,
    /// A newer request was begun.
    Superseded,
}

/// Result of [`Store::apply_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsApplication {
    Applied,
    Discarded(StaleReason),
}

impl MetricsApplication {
    pub fn is_applied(&self) -> bool {
        matches!(self, MetricsApplication::Applied)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    catalog: Catalog,
    selection: SelectionSet,
    metrics: AggregateMetrics,
    aggregator: ProgressAggregator,
    tree_generation: u64,
    latest_request: u64,
}

impl Store {
    pub fn new(aggregator: ProgressAggregator) -> Self {
        Self {
            aggregator,
            ..Self::default()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read-only views
    // ─────────────────────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Last published metrics; empty until the first recomputation.
    pub fn metrics(&self) -> &AggregateMetrics {
        &self.metrics
    }

    /// Incremented on every successful tree load.
    pub fn tree_generation(&self) -> u64 {
        self.tree_generation
    }

    pub fn is_selected(&self, id: ProgramId) -> bool {
        self.selection.contains(id)
    }

    pub fn active_agency(&self) -> Option<AgencyId> {
        self.selection.active_agency()
    }

    /// Selected Programs in ascending id order.
    pub fn selected_programs(&self) -> Vec<&Program> {
        self.selection
            .iter()
            .filter_map(|id| self.catalog.program(id))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetches and loads the tree for `scope`.
    ///
    /// On any error the previously loaded tree, selection, and metrics stay
    /// in place.
    pub async fn load_tree(
        &mut self,
        source: &dyn TreeSource,
        scope: &ScopeId,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        let raw = source.fetch_tree(scope, credential).await?;
        self.replace_tree(raw)?;
        Ok(())
    }

    /// Normalizes `raw` and installs it, clearing selection and metrics.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTreeError` without touching the current state.
    pub fn replace_tree(&mut self, raw: Vec<RawArea>) -> Result<(), MalformedTreeError> {
        let catalog = normalize(raw)?;

        info!(
            areas = catalog.areas().len(),
            groups = catalog.groups().len(),
            programs = catalog.programs().len(),
            generation = self.tree_generation + 1,
            "tree loaded"
        );

        self.catalog = catalog;
        self.selection.clear();
        self.metrics = AggregateMetrics::empty();
        self.tree_generation += 1;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Flips `id`; ids outside the loaded tree are ignored.
    pub fn toggle_program(&mut self, id: ProgramId) -> bool {
        self.selection.toggle_program(&self.catalog, id)
    }

    pub fn select(&mut self, id: ProgramId) -> bool {
        self.selection.select(&self.catalog, id)
    }

    pub fn deselect(&mut self, id: ProgramId) -> bool {
        self.selection.deselect(id)
    }

    pub fn toggle_agency(&mut self, agency: &Agency) -> AgencyToggle {
        self.selection.toggle_agency(&self.catalog, agency)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metrics
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshots the current selection for a recomputation.
    ///
    /// Supersedes every request begun earlier.
    pub fn begin_recompute(&mut self) -> MetricsRequest {
        self.latest_request += 1;

        let placements = self
            .selection
            .iter()
            .filter_map(|id| self.catalog.placement(id))
            .collect();

        MetricsRequest {
            request_id: self.latest_request,
            tree_generation: self.tree_generation,
            placements,
            aggregator: self.aggregator,
        }
    }

    /// Publishes `pending` unless it is stale.
    pub fn apply_metrics(&mut self, pending: PendingMetrics) -> MetricsApplication {
        if pending.tree_generation != self.tree_generation {
            debug!(
                request_id = pending.request_id,
                request_generation = pending.tree_generation,
                current_generation = self.tree_generation,
                "discarding metrics computed for a previous tree"
            );
            return MetricsApplication::Discarded(StaleReason::TreeReloaded);
        }
        if pending.request_id != self.latest_request {
            debug!(
                request_id = pending.request_id,
                latest_request = self.latest_request,
                "discarding superseded metrics"
            );
            return MetricsApplication::Discarded(StaleReason::Superseded);
        }

        self.metrics = pending.metrics;
        MetricsApplication::Applied
    }

    /// Recomputes and publishes metrics for the current selection.
    pub async fn refresh_metrics(
        &mut self,
        source: &dyn ProgressSource,
        credential: &Credential,
    ) -> &AggregateMetrics {
        let pending = self.begin_recompute().run(source, credential).await;
        self.apply_metrics(pending);
        &self.metrics
    }
}
