//! Tree normalizer - flattens a raw Area → Group → Program payload.
//!
//! # Invariants
//!
//! - Areas, Groups, and Programs are each in strictly ascending id order
//! - Every `program.group_id` names a Group in the same catalog
//! - Every `group.area_id` names an Area in the same catalog
//! - Identifiers are unique within their level across the whole tree

use std::collections::{HashMap, HashSet};

use super::entities::{Area, Group, Program, ProgramPlacement};
use super::errors::{MalformedTreeError, TreeLevel};
use super::raw::RawArea;
use crate::domain::foundation::{AreaId, GroupId, ProgramId};

/// A normalized, cross-referenced catalog tree.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    areas: Vec<Area>,
    groups: Vec<Group>,
    programs: Vec<Program>,
    area_index: HashMap<AreaId, usize>,
    group_index: HashMap<GroupId, usize>,
    program_index: HashMap<ProgramId, usize>,
}

impl Catalog {
    /// An empty catalog (nothing loaded yet, or the source had no data).
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_sorted(areas: Vec<Area>, groups: Vec<Group>, programs: Vec<Program>) -> Self {
        let area_index = areas.iter().enumerate().map(|(i, a)| (a.id(), i)).collect();
        let group_index = groups.iter().enumerate().map(|(i, g)| (g.id(), i)).collect();
        let program_index = programs
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id(), i))
            .collect();
        Self {
            areas,
            groups,
            programs,
            area_index,
            group_index,
            program_index,
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.area_index.get(&id).map(|&i| &self.areas[i])
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.group_index.get(&id).map(|&i| &self.groups[i])
    }

    pub fn program(&self, id: ProgramId) -> Option<&Program> {
        self.program_index.get(&id).map(|&i| &self.programs[i])
    }

    pub fn contains_program(&self, id: ProgramId) -> bool {
        self.program_index.contains_key(&id)
    }

    /// Returns the placement of a loaded Program.
    pub fn placement(&self, id: ProgramId) -> Option<ProgramPlacement> {
        self.program(id).map(Program::placement)
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Normalizes a raw tree into a [`Catalog`].
///
/// # Errors
///
/// - `MissingIdentifier` if any Area, Group, or Program has no id
/// - `DuplicateIdentifier` if an id repeats within its level
/// - `DanglingReference` if a Group's explicit `area` disagrees with its parent
pub fn normalize(raw_areas: Vec<RawArea>) -> Result<Catalog, MalformedTreeError> {
    let mut areas = Vec::with_capacity(raw_areas.len());
    let mut groups = Vec::new();
    let mut programs = Vec::new();

    let mut seen_areas = HashSet::new();
    let mut seen_groups = HashSet::new();
    let mut seen_programs = HashSet::new();

    for (area_pos, raw_area) in raw_areas.into_iter().enumerate() {
        let area_id = raw_area.id.ok_or_else(|| {
            MalformedTreeError::missing_identifier(TreeLevel::Area, format!("position {area_pos}"))
        })?;
        if !seen_areas.insert(area_id) {
            return Err(MalformedTreeError::duplicate(TreeLevel::Area, area_id));
        }
        let area_id = AreaId::new(area_id);

        let mut group_ids = Vec::with_capacity(raw_area.groups.len());
        for (group_pos, raw_group) in raw_area.groups.into_iter().enumerate() {
            let group_id = raw_group.id.ok_or_else(|| {
                MalformedTreeError::missing_identifier(
                    TreeLevel::Group,
                    format!("area {area_id}, position {group_pos}"),
                )
            })?;
            if !seen_groups.insert(group_id) {
                return Err(MalformedTreeError::duplicate(TreeLevel::Group, group_id));
            }
            let group_id = GroupId::new(group_id);

            if let Some(referenced) = raw_group.area {
                if referenced != area_id.value() {
                    return Err(MalformedTreeError::DanglingReference {
                        group: group_id,
                        referenced: AreaId::new(referenced),
                        parent: area_id,
                    });
                }
            }

            let mut program_ids = Vec::with_capacity(raw_group.programs.len());
            for (program_pos, raw_program) in raw_group.programs.into_iter().enumerate() {
                let program_id = raw_program.id.ok_or_else(|| {
                    MalformedTreeError::missing_identifier(
                        TreeLevel::Program,
                        format!("group {group_id}, position {program_pos}"),
                    )
                })?;
                if !seen_programs.insert(program_id) {
                    return Err(MalformedTreeError::duplicate(TreeLevel::Program, program_id));
                }
                let program_id = ProgramId::new(program_id);

                program_ids.push(program_id);
                programs.push(Program::new(
                    program_id,
                    group_id,
                    area_id,
                    raw_program.name,
                    raw_program.description,
                    raw_program.question_count,
                ));
            }

            program_ids.sort_unstable();
            group_ids.push(group_id);
            groups.push(Group::new(group_id, area_id, raw_group.name, program_ids));
        }

        group_ids.sort_unstable();
        areas.push(Area::new(area_id, raw_area.name, group_ids));
    }

    // Ids are unique per level, so an unstable sort is still deterministic.
    areas.sort_unstable_by_key(Area::id);
    groups.sort_unstable_by_key(Group::id);
    programs.sort_unstable_by_key(Program::id);

    Ok(Catalog::from_sorted(areas, groups, programs))
}
