//! Agency - a cross-cutting grouping of Programs used for bulk selection.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AgencyId, ProgramId};

/// An externally supplied grouping of Programs.
///
/// Agencies are independent of the Area/Group/Program ownership tree; their
/// program lists may mention Programs that are not in the loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    id: AgencyId,
    name: String,
    program_ids: Vec<ProgramId>,
}

impl Agency {
    pub fn new(id: AgencyId, name: impl Into<String>, program_ids: Vec<ProgramId>) -> Self {
        Self {
            id,
            name: name.into(),
            program_ids,
        }
    }

    pub fn id(&self) -> AgencyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program_ids(&self) -> &[ProgramId] {
        &self.program_ids
    }
}
