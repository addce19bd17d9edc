//! Goal domain model.
//!
//! # Responsibility
//! - Define the goal record referenced (never owned) by calendar events.
//!
//! # Invariants
//! - `id` is non-empty and never reused for another goal.
//! - `target_allocation` is a percentage in `0..=100`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque goal identifier.
///
/// Seed data uses short ids (`g1`); generated ids carry a `g-` prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh unique id.
    pub fn generate() -> Self {
        Self(format!("g-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for GoalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A user goal that calendar time can be aligned with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    /// Display token (hex color) used by the rendering layer.
    pub color: String,
    /// Desired share of scheduled time, in percent.
    pub target_allocation: u8,
}

impl Goal {
    pub fn new(
        id: GoalId,
        title: impl Into<String>,
        color: impl Into<String>,
        target_allocation: u8,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            color: color.into(),
            target_allocation: target_allocation.min(100),
        }
    }
}
