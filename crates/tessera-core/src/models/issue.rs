//! Consistency issues and the outcome of resolving them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NaturalKey;
use crate::intent::IntentField;

/// Rule severity. `Blocking` sorts after `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Blocking,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Blocking => f.write_str("blocking"),
        }
    }
}

/// One side of a conflict: the field, and the chosen element if the clash
/// comes from a selection rather than from the intent's own code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSide {
    pub field: IntentField,
    pub element: Option<NaturalKey>,
    /// Tokens that satisfied the rule predicate.
    pub matched: Vec<String>,
    /// The intent's own attribute code satisfied the predicate, so swapping
    /// the element cannot clear the conflict.
    pub from_intent: bool,
}

/// A rule violation found in a selection set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub rule_id: String,
    pub severity: Severity,
    pub description: String,
    /// `first.field < second.field` always holds.
    pub first: IssueSide,
    pub second: IssueSide,
    /// Field named by the rule as the one that gives way.
    pub yields: Option<IntentField>,
}

impl Issue {
    /// `(fieldA, fieldB, rule_id)` used for de-duplication.
    pub fn dedup_key(&self) -> (IntentField, IntentField, &str) {
        (self.first.field, self.second.field, self.rule_id.as_str())
    }

    pub fn involves(&self, field: IntentField) -> bool {
        self.first.field == field || self.second.field == field
    }

    pub fn side(&self, field: IntentField) -> Option<&IssueSide> {
        if self.first.field == field {
            Some(&self.first)
        } else if self.second.field == field {
            Some(&self.second)
        } else {
            None
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

/// A replacement made by the conflict resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub field: IntentField,
    pub original: NaturalKey,
    pub replacement: NaturalKey,
    pub rule_id: String,
    pub reason: String,
}

/// Why an issue could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The subordinate side is the intent's own attribute code; there is no
    /// selection to swap.
    IntentPinned,
    /// The subordinate field was already resolved earlier in this request.
    FieldAlreadyResolved,
    NoCompatibleReplacement,
    /// The replacement query timed out.
    RepositoryTimeout,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::IntentPinned => "subordinate side is pinned by the intent",
            Self::FieldAlreadyResolved => "field already resolved in this request",
            Self::NoCompatibleReplacement => "no compatible replacement",
            Self::RepositoryTimeout => "replacement query timed out",
        };
        f.write_str(s)
    }
}

/// An issue escalated to the caller. Always carries `Blocking` severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedIssue {
    pub issue: Issue,
    /// The field that should have given way.
    pub subordinate: IntentField,
    pub reason: UnresolvedReason,
}

impl UnresolvedIssue {
    pub fn new(mut issue: Issue, subordinate: IntentField, reason: UnresolvedReason) -> Self {
        issue.severity = Severity::Blocking;
        Self {
            issue,
            subordinate,
            reason,
        }
    }
}
