//! Catalog module - the Area → Group → Program hierarchy.
//!
//! Raw payloads from the tree source are normalized into a [`Catalog`]:
//! flat, sorted, cross-referenced collections with back-links.

mod entities;
mod errors;
mod normalizer;
mod raw;

pub use entities::{Area, Group, Program, ProgramPlacement};
pub use errors::{MalformedTreeError, TreeLevel};
pub use normalizer::{normalize, Catalog};
pub use raw::{RawArea, RawGroup, RawProgram};
