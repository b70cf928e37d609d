use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::VerbosityMode;

/// Composer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Mode used when the caller does not pick one.
    pub default_mode: VerbosityMode,
    /// K: keywords rendered per field in `detailed` mode.
    pub detailed_keyword_limit: usize,
    pub max_fragments: usize,
    /// Character ceiling for the whole text, separators included.
    pub max_chars: usize,
    pub separator: String,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            default_mode: VerbosityMode::default(),
            detailed_keyword_limit: defaults::DEFAULT_DETAILED_KEYWORD_LIMIT,
            max_fragments: defaults::DEFAULT_MAX_FRAGMENTS,
            max_chars: defaults::DEFAULT_MAX_CHARS,
            separator: defaults::DEFAULT_SEPARATOR.to_string(),
        }
    }
}
