use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RepositoryError;
use crate::intent::IntentField;
use crate::models::{CompositionResult, NaturalKey, VerbosityMode};

/// A persisted composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    pub id: i64,
    pub request_id: String,
    pub text: String,
    /// BLAKE3 hex digest of `text`.
    pub fingerprint: String,
    pub mode: VerbosityMode,
    pub library_version: String,
    pub created_at: DateTime<Utc>,
    pub elements: Vec<(IntentField, NaturalKey)>,
}

/// Aggregate usage of one element across recorded compositions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub key: NaturalKey,
    pub usage_count: u64,
    pub last_used: Option<DateTime<Utc>>,
}

/// Composition history sink.
pub trait ICompositionLog: Send + Sync {
    /// Persist `result` and bump usage statistics for every element it used.
    /// Returns the record id.
    fn record_composition(&self, result: &CompositionResult) -> Result<i64, RepositoryError>;

    fn usage_stats(&self, key: &NaturalKey) -> Result<Option<UsageStats>, RepositoryError>;

    /// Most recent first.
    fn recent_compositions(&self, limit: usize) -> Result<Vec<CompositionRecord>, RepositoryError>;
}
