//! Span definitions per pipeline stage. Every span carries the request id.

/// Span around one whole composition request.
#[macro_export]
macro_rules! request_span {
    ($request_id:expr, $domain:expr) => {
        tracing::info_span!("tessera.request", request_id = %$request_id, domain = %$domain)
    };
}

/// Create a selection span.
#[macro_export]
macro_rules! select_span {
    ($request_id:expr, $fields:expr) => {
        tracing::info_span!("tessera.select", request_id = %$request_id, fields = $fields)
    };
}

/// Create a consistency-check span.
#[macro_export]
macro_rules! check_span {
    ($request_id:expr, $rules_version:expr) => {
        tracing::info_span!(
            "tessera.check",
            request_id = %$request_id,
            rules_version = %$rules_version
        )
    };
}

/// Create a conflict-resolution span.
#[macro_export]
macro_rules! resolve_span {
    ($request_id:expr, $issues:expr) => {
        tracing::info_span!("tessera.resolve", request_id = %$request_id, issues = $issues)
    };
}

/// Create a composition span.
#[macro_export]
macro_rules! compose_span {
    ($request_id:expr, $mode:expr) => {
        tracing::info_span!("tessera.compose", request_id = %$request_id, mode = %$mode)
    };
}

/// Create a completeness-audit span.
#[macro_export]
macro_rules! audit_span {
    ($request_id:expr) => {
        tracing::info_span!("tessera.audit", request_id = %$request_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const REQUEST: &str = "tessera.request";
    pub const SELECT: &str = "tessera.select";
    pub const CHECK: &str = "tessera.check";
    pub const RESOLVE: &str = "tessera.resolve";
    pub const COMPOSE: &str = "tessera.compose";
    pub const AUDIT: &str = "tessera.audit";

    /// Stage spans in pipeline order.
    pub const STAGES: [&str; 5] = [SELECT, CHECK, RESOLVE, COMPOSE, AUDIT];
}
