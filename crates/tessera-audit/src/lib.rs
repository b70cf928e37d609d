//! # tessera-audit
//!
//! Completeness Auditor: checks that every requirement of the original intent
//! is observable in the composed text and reports the ones that are not.

pub mod auditor;
pub mod requirement;

pub use auditor::CompletenessAuditor;
pub use requirement::{requirements, Requirement, MIN_EVIDENCE_TERM_CHARS};
