//! Selection module - which Programs the user is working on.
//!
//! Selection holds identifiers only; the catalog owns the entities.

mod agency;
mod selection_set;

pub use agency::Agency;
pub use selection_set::{AgencyToggle, SelectionSet};
