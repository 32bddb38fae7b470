//! Raw catalog payloads as delivered by the tree source.
//!
//! These mirror the backend's nested Area → Group → Program representation.
//! Identifiers are optional here so that a payload missing one can be
//! rejected by the normalizer instead of failing deserialization opaquely.

use serde::{Deserialize, Serialize};

/// An Area as received, owning its nested Groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArea {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub groups: Vec<RawGroup>,
}

/// A Group as received, owning its nested Programs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGroup {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    /// Back-reference to the owning Area, when the payload carries one.
    #[serde(default)]
    pub area: Option<u64>,
    #[serde(default)]
    pub programs: Vec<RawProgram>,
}

/// A Program as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProgram {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Full question count, when the payload reports it.
    #[serde(default)]
    pub question_count: Option<u32>,
}

impl RawArea {
    pub fn new(id: u64, name: impl Into<String>, groups: Vec<RawGroup>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            groups,
        }
    }
}

impl RawGroup {
    pub fn new(id: u64, name: impl Into<String>, programs: Vec<RawProgram>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            area: None,
            programs,
        }
    }

    /// Sets the explicit back-reference to the owning Area.
    pub fn with_area(mut self, area: u64) -> Self {
        self.area = Some(area);
        self
    }
}

impl RawProgram {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description: String::new(),
            question_count: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }
}
