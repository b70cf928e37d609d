/// Conflict rule table errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("failed to read rule table {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse rule table {source_name}: {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("rule table version is empty")]
    MissingVersion,

    #[error("duplicate rule id {id:?}")]
    DuplicateRuleId { id: String },

    #[error("rule {id:?} has {count} predicate(s), needs at least 2")]
    TooFewPredicates { id: String, count: usize },

    #[error("rule {id:?} names field {field} twice")]
    DuplicatePredicateField { id: String, field: String },

    #[error("rule {id:?} has an empty value list for {field}")]
    EmptyValues { id: String, field: String },

    #[error("rule {id:?} yields {field}, which none of its predicates names")]
    YieldsNotInRule { id: String, field: String },
}
