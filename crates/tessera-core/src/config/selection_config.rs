use serde::{Deserialize, Serialize};

use super::defaults;

/// Scorer and selector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Weight of relevance in the final score.
    pub relevance_weight: f64,
    /// Weight of normalized quality in the final score.
    pub quality_weight: f64,
    /// Added to relevance when the candidate's category is the field's category.
    pub category_bonus: f64,
    /// Minimum relevance for injected-keyword candidates.
    pub keyword_relevance_floor: f64,
    /// How many injected-keyword candidates to keep.
    pub keyword_top_n: usize,
    /// Max candidates requested per field query.
    pub candidate_limit: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            relevance_weight: defaults::DEFAULT_RELEVANCE_WEIGHT,
            quality_weight: defaults::DEFAULT_QUALITY_WEIGHT,
            category_bonus: defaults::DEFAULT_CATEGORY_BONUS,
            keyword_relevance_floor: defaults::DEFAULT_KEYWORD_RELEVANCE_FLOOR,
            keyword_top_n: defaults::DEFAULT_KEYWORD_TOP_N,
            candidate_limit: defaults::DEFAULT_CANDIDATE_LIMIT,
        }
    }
}
