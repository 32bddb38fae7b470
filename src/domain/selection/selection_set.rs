//! SelectionSet - the Programs chosen for the current session.
//!
//! # Invariants
//!
//! - Every selected id belongs to the catalog it was selected against
//! - At most one agency is active through the bulk path at a time
//! - Activating and then deactivating an agency restores the prior selection

use std::collections::BTreeSet;

use tracing::debug;

use super::agency::Agency;
use crate::domain::catalog::Catalog;
use crate::domain::foundation::{AgencyId, ProgramId};

/// Outcome of a bulk agency toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgencyToggle {
    /// The agency became the active one and its Programs were selected.
    Activated { replaced: Option<AgencyId> },
    /// The agency was active and its Programs were deselected.
    Deactivated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveAgency {
    id: AgencyId,
    /// Programs this activation inserted; only these are removed on deactivation.
    added: BTreeSet<ProgramId>,
}

/// Set of selected Program identifiers plus the active bulk-selected agency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<ProgramId>,
    active_agency: Option<ActiveAgency>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn contains(&self, id: ProgramId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ProgramId> + '_ {
        self.selected.iter().copied()
    }

    pub fn ids(&self) -> &BTreeSet<ProgramId> {
        &self.selected
    }

    pub fn active_agency(&self) -> Option<AgencyId> {
        self.active_agency.as_ref().map(|a| a.id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Flips membership of `id`. Returns whether the Program is now selected.
    ///
    /// Ids outside `catalog` are ignored and leave the set untouched.
    pub fn toggle_program(&mut self, catalog: &Catalog, id: ProgramId) -> bool {
        if !catalog.contains_program(id) {
            debug!(program_id = %id, "ignoring toggle of program outside loaded tree");
            return false;
        }
        if self.selected.remove(&id) {
            debug!(program_id = %id, "program deselected");
            false
        } else {
            self.selected.insert(id);
            debug!(program_id = %id, "program selected");
            true
        }
    }

    /// Selects `id`. Returns true if membership changed.
    pub fn select(&mut self, catalog: &Catalog, id: ProgramId) -> bool {
        if !catalog.contains_program(id) {
            debug!(program_id = %id, "ignoring select of program outside loaded tree");
            return false;
        }
        self.selected.insert(id)
    }

    /// Deselects `id`. Returns true if membership changed.
    pub fn deselect(&mut self, id: ProgramId) -> bool {
        self.selected.remove(&id)
    }

    /// Bulk-toggles an agency's Programs.
    ///
    /// If `agency` is the active one, the Programs its activation added are
    /// deselected and the marker cleared. Otherwise any other active agency is
    /// deactivated first, then this agency's loaded Programs are selected and
    /// it becomes active.
    ///
    /// Deactivation, including replacement by another agency, removes only
    /// the Programs that agency's activation added. Programs that were
    /// already selected individually stay selected, so "A then B leaves only
    /// B's Programs" holds exactly when A started from a selection disjoint
    /// from its own Programs.
    pub fn toggle_agency(&mut self, catalog: &Catalog, agency: &Agency) -> AgencyToggle {
        if self.active_agency() == Some(agency.id()) {
            self.deactivate_agency();
            debug!(agency_id = %agency.id(), "agency deactivated");
            return AgencyToggle::Deactivated;
        }

        let replaced = self.deactivate_agency();

        let mut added = BTreeSet::new();
        for &id in agency.program_ids() {
            if catalog.contains_program(id) && self.selected.insert(id) {
                added.insert(id);
            }
        }
        debug!(
            agency_id = %agency.id(),
            added = added.len(),
            replaced = ?replaced,
            "agency activated"
        );
        self.active_agency = Some(ActiveAgency {
            id: agency.id(),
            added,
        });

        AgencyToggle::Activated { replaced }
    }

    /// Empties the selection and clears the active agency.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.active_agency = None;
    }

    fn deactivate_agency(&mut self) -> Option<AgencyId> {
        let active = self.active_agency.take()?;
        for id in &active.added {
            self.selected.remove(id);
        }
        Some(active.id)
    }
}
