//! EPIC Tracker - program selection and questionnaire progress aggregation.
//!
//! Users browse an Area → Group → Program tree, select Programs individually
//! or in bulk through an agency, and track aggregate completion computed from
//! per-Program progress fetched on demand.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
