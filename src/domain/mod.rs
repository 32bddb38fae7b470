//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, percentages, errors)
//! - `catalog` - Raw tree payloads, normalized entities, and the normalizer
//! - `selection` - Selection set and agency bulk selection
//! - `progress` - Progress records and the aggregation function

pub mod catalog;
pub mod foundation;
pub mod progress;
pub mod selection;
