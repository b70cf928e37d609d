//! Error handling for tessera.
//! One error enum per subsystem, `thiserror` only, aggregated by `TesseraError`.

pub mod advisory;
pub mod config_error;
pub mod intent_error;
pub mod repository_error;
pub mod rule_error;
pub mod storage_error;

pub use advisory::Advisory;
pub use config_error::ConfigError;
pub use intent_error::IntentError;
pub use repository_error::RepositoryError;
pub use rule_error::RuleError;
pub use storage_error::StorageError;

/// Top-level error for a composition request.
///
/// Only `InvalidIntent` and `RepositoryUnavailable` are expected to reach a
/// caller during normal operation; field-level problems are reported as
/// [`Advisory`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    #[error("invalid intent: {0}")]
    InvalidIntent(#[from] IntentError),

    #[error("repository unavailable: {reason}")]
    RepositoryUnavailable { reason: String },

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("rule table error: {0}")]
    Rules(#[from] RuleError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("element {key} selected twice in one selection set")]
    DuplicateSelection { key: String },

    #[error("element {key} was not returned by a repository query in this request")]
    ProvenanceViolation { key: String },
}

/// Result alias used across the workspace.
pub type TesseraResult<T> = Result<T, TesseraError>;
