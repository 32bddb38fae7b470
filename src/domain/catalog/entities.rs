//! Normalized catalog entities.
//!
//! Entities are owned exclusively by the [`Catalog`](super::Catalog) they were
//! normalized into. Everything else refers to them by identifier.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AreaId, GroupId, ProgramId};

/// Top-level grouping of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    id: AreaId,
    name: String,
    group_ids: Vec<GroupId>,
}

impl Area {
    pub(crate) fn new(id: AreaId, name: String, group_ids: Vec<GroupId>) -> Self {
        Self {
            id,
            name,
            group_ids,
        }
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owned Groups in ascending identifier order.
    pub fn group_ids(&self) -> &[GroupId] {
        &self.group_ids
    }
}

/// Mid-level grouping owned by exactly one Area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    area_id: AreaId,
    name: String,
    program_ids: Vec<ProgramId>,
}

impl Group {
    pub(crate) fn new(
        id: GroupId,
        area_id: AreaId,
        name: String,
        program_ids: Vec<ProgramId>,
    ) -> Self {
        Self {
            id,
            area_id,
            name,
            program_ids,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn area_id(&self) -> AreaId {
        self.area_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owned Programs in ascending identifier order.
    pub fn program_ids(&self) -> &[ProgramId] {
        &self.program_ids
    }
}

/// Leaf unit of work owned by exactly one Group.
///
/// `area_id` is denormalized from the owning Group for O(1) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    id: ProgramId,
    group_id: GroupId,
    area_id: AreaId,
    name: String,
    description: String,
    question_count: Option<u32>,
}

impl Program {
    pub(crate) fn new(
        id: ProgramId,
        group_id: GroupId,
        area_id: AreaId,
        name: String,
        description: String,
        question_count: Option<u32>,
    ) -> Self {
        Self {
            id,
            group_id,
            area_id,
            name,
            description,
            question_count,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn area_id(&self) -> AreaId {
        self.area_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Full question count, if the tree source reported one.
    pub fn question_count(&self) -> Option<u32> {
        self.question_count
    }

    /// Identifier-only view of where this Program sits in the hierarchy.
    pub fn placement(&self) -> ProgramPlacement {
        ProgramPlacement {
            program_id: self.id,
            group_id: self.group_id,
            area_id: self.area_id,
            question_count: self.question_count,
        }
    }
}

/// Identifiers locating a Program in the hierarchy.
///
/// Captured when an aggregation starts so the aggregation never holds
/// references into a catalog that may be replaced while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramPlacement {
    pub program_id: ProgramId,
    pub group_id: GroupId,
    pub area_id: AreaId,
    pub question_count: Option<u32>,
}
