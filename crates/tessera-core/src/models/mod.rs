//! Domain models shared across the pipeline stages.

pub mod candidate;
pub mod composition;
pub mod element;
pub mod gap;
pub mod issue;
pub mod rule;
pub mod selection;

pub use candidate::Candidate;
pub use composition::{CompositionParts, CompositionResult, Fragment, VerbosityMode};
pub use element::{Element, NaturalKey, Provenance, MAX_QUALITY, MIN_TEMPLATE_CHARS};
pub use gap::{CompletenessGap, GapReason};
pub use issue::{Issue, IssueSide, Resolution, Severity, UnresolvedIssue, UnresolvedReason};
pub use rule::{ConflictRule, Predicate, RuleTable};
pub use selection::{Choice, FieldSelection, FrozenSelection, SelectionSet};
