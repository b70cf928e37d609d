use serde::{Deserialize, Serialize};

use super::defaults;
use crate::intent::DominanceOrder;

/// Conflict resolution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Dimensions, most dominant first. Also drives text order and truncation.
    pub dominance: DominanceOrder,
    /// Max candidates fetched when looking for a replacement.
    pub requery_limit: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            dominance: DominanceOrder::default(),
            requery_limit: defaults::DEFAULT_REQUERY_LIMIT,
        }
    }
}
