//! Non-fatal conditions collected while a request runs.

use serde::Serialize;

use crate::intent::IntentField;

/// A recoverable, field-level problem. Collected on the outcome of a request
/// rather than aborting it.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    #[error("no candidates found for {field}")]
    NoCandidates { field: IntentField },

    #[error("repository query for {field} timed out after {elapsed_ms} ms")]
    QueryTimedOut { field: IntentField, elapsed_ms: u64 },

    #[error("unresolved conflict {rule_id} between {first} and {second}")]
    UnresolvedConflict {
        rule_id: String,
        first: IntentField,
        second: IntentField,
    },
}

impl Advisory {
    /// The intent field this advisory is about (the subordinate side for conflicts).
    pub fn field(&self) -> IntentField {
        match self {
            Self::NoCandidates { field } | Self::QueryTimedOut { field, .. } => *field,
            Self::UnresolvedConflict { second, .. } => *second,
        }
    }
}
