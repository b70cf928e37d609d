use super::StorageError;

/// Element repository errors.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("repository query timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    #[error("element {key} already exists")]
    DuplicateKey { key: String },

    #[error("invalid element {key}: {reason}")]
    InvalidElement { key: String, reason: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl RepositoryError {
    /// Timeouts degrade a single field; everything else is treated as an outage.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
