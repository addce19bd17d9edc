//! Strategic document review result.
//!
//! # Invariants
//! - `alignment_score` is within `0..=100`.

use serde::{Deserialize, Serialize};

/// Verdict on how well an uploaded document fits the active goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocAnalysis {
    pub alignment_score: u8,
    /// Short verdict label, for example `Aligned`.
    pub status: String,
    /// Conflicts with goals or principles.
    pub issues: Vec<String>,
    /// Evidence the document should provide but does not.
    pub missing_data: Vec<String>,
}

impl DocAnalysis {
    pub fn new(
        alignment_score: u8,
        status: impl Into<String>,
        issues: Vec<String>,
        missing_data: Vec<String>,
    ) -> Self {
        Self {
            alignment_score: alignment_score.min(100),
            status: status.into(),
            issues,
            missing_data,
        }
    }
}
