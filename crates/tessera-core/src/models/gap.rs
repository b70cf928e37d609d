use std::fmt;

use serde::Serialize;

use crate::intent::IntentField;

/// Why a requirement is missing from the composed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapReason {
    /// The repository returned nothing for the field.
    NoCandidates,
    /// The field's fragment was dropped to fit the length budget.
    Truncated,
    /// The selection was swapped out during conflict resolution.
    ReplacedByResolution,
    /// A fragment was rendered but none of the expected wording survived.
    NotRepresented,
}

impl fmt::Display for GapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoCandidates => "no_candidates",
            Self::Truncated => "truncated",
            Self::ReplacedByResolution => "replaced_by_resolution",
            Self::NotRepresented => "not_represented",
        };
        f.write_str(s)
    }
}

/// A requirement of the original intent not observable in the final text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessGap {
    pub field: IntentField,
    /// Human-readable requirement, e.g. `era=ancient` or `keywords:"side profile"`.
    pub requirement: String,
    pub expected_keywords: Vec<String>,
    pub reason: GapReason,
    /// Phrase the caller could append to satisfy the requirement.
    pub suggestion: String,
}
