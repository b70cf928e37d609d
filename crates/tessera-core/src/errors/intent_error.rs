/// Structural problems with an Intent. Raised before any repository call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntentError {
    #[error("intent domain is empty")]
    EmptyDomain,

    #[error("invalid domain {domain:?}: {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("invalid attribute code {code:?} for {field}: {reason}")]
    InvalidAttributeCode {
        field: String,
        code: String,
        reason: String,
    },

    #[error("keyword phrase #{index} is empty")]
    EmptyKeywordPhrase { index: usize },

    #[error("keyword phrase #{index} is {len} chars, max {max}")]
    KeywordPhraseTooLong { index: usize, len: usize, max: usize },

    #[error("field {field} cannot carry a {kind} request")]
    MismatchedRequest { field: String, kind: String },

    #[error("unknown intent field {name:?}")]
    UnknownField { name: String },

    #[error("intent requests no fields")]
    NothingRequested,
}
