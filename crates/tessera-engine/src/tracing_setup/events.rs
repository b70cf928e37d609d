//! Structured log events for conflicts, resolutions, gaps and degraded queries.
//!
//! Each function emits one `tracing` event with an `event` field naming it.

use tessera_core::errors::Advisory;
use tessera_core::models::{CompletenessGap, Issue, Resolution, UnresolvedIssue};
use uuid::Uuid;

/// Log a rule violation found by the checker.
pub fn conflict_detected(request_id: Uuid, issue: &Issue) {
    tracing::info!(
        event = "conflict_detected",
        request_id = %request_id,
        rule_id = %issue.rule_id,
        severity = %issue.severity,
        first = %issue.first.field,
        second = %issue.second.field,
        "conflict detected"
    );
}

/// Log a replacement made by the resolver.
pub fn conflict_resolved(request_id: Uuid, resolution: &Resolution) {
    tracing::info!(
        event = "conflict_resolved",
        request_id = %request_id,
        rule_id = %resolution.rule_id,
        field = %resolution.field,
        original = %resolution.original,
        replacement = %resolution.replacement,
        "conflict resolved"
    );
}

/// Log an issue escalated to the caller.
pub fn conflict_unresolved(request_id: Uuid, unresolved: &UnresolvedIssue) {
    tracing::warn!(
        event = "conflict_unresolved",
        request_id = %request_id,
        rule_id = %unresolved.issue.rule_id,
        subordinate = %unresolved.subordinate,
        reason = %unresolved.reason,
        "conflict left unresolved"
    );
}

/// Log a field that degraded to no candidates.
pub fn query_degraded(request_id: Uuid, advisory: &Advisory) {
    tracing::warn!(
        event = "query_degraded",
        request_id = %request_id,
        field = %advisory.field(),
        detail = %advisory,
        "field degraded"
    );
}

/// Log a requirement missing from the composed text.
pub fn completeness_gap(request_id: Uuid, gap: &CompletenessGap) {
    tracing::info!(
        event = "completeness_gap",
        request_id = %request_id,
        requirement = %gap.requirement,
        reason = %gap.reason,
        suggestion = %gap.suggestion,
        "completeness gap"
    );
}

/// Log the end of a request.
pub fn request_completed(request_id: Uuid, chars: usize, gaps: usize, advisories: usize) {
    tracing::info!(
        event = "request_completed",
        request_id = %request_id,
        chars = chars,
        gaps = gaps,
        advisories = advisories,
        "composition request completed"
    );
}
