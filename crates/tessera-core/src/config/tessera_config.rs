//! Top-level tessera configuration with layered resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    defaults, CompositionConfig, ObservabilityConfig, RepositoryConfig, ResolutionConfig,
    SelectionConfig,
};
use crate::errors::ConfigError;
use crate::intent::{IntentField, KeywordVocabulary};

/// Conflict rule table source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// TOML rule table. The built-in table is used when unset.
    pub path: Option<String>,
}

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`TESSERA_*`)
/// 2. Project config (`tessera.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    pub selection: SelectionConfig,
    pub composition: CompositionConfig,
    pub resolution: ResolutionConfig,
    pub repository: RepositoryConfig,
    pub rules: RulesConfig,
    pub observability: ObservabilityConfig,
    /// Attribute code (or `field.code`) → expected keyword phrases.
    pub vocabulary: BTreeMap<String, Vec<String>>,
    /// Intent field name → repository category override.
    pub categories: BTreeMap<String, String>,
}

impl TesseraConfig {
    /// Load with layered resolution and validate the result.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let project_config_path = root.join(defaults::PROJECT_CONFIG_FILE);
        let mut config = if project_config_path.exists() {
            Self::from_file(&project_config_path)?
        } else {
            Self::default()
        };

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys take compiled defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |field: &str, message: &str| {
            Err(ConfigError::ValidationFailed {
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        let s = &self.selection;
        for (name, value) in [
            ("selection.relevance_weight", s.relevance_weight),
            ("selection.quality_weight", s.quality_weight),
            ("selection.category_bonus", s.category_bonus),
            ("selection.keyword_relevance_floor", s.keyword_relevance_floor),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return fail(name, "must be between 0.0 and 1.0");
            }
        }
        if s.relevance_weight + s.quality_weight <= 0.0 {
            return fail("selection", "relevance_weight + quality_weight must be positive");
        }
        if s.keyword_top_n == 0 {
            return fail("selection.keyword_top_n", "must be greater than 0");
        }
        if s.candidate_limit == 0 {
            return fail("selection.candidate_limit", "must be greater than 0");
        }

        let c = &self.composition;
        if c.detailed_keyword_limit == 0 {
            return fail("composition.detailed_keyword_limit", "must be greater than 0");
        }
        if c.max_fragments == 0 {
            return fail("composition.max_fragments", "must be greater than 0");
        }
        if c.max_chars == 0 {
            return fail("composition.max_chars", "must be greater than 0");
        }
        if c.separator.is_empty() {
            return fail("composition.separator", "must not be empty");
        }

        if !self.resolution.dominance.is_complete() {
            return fail(
                "resolution.dominance",
                "must list every dimension exactly once",
            );
        }
        if self.resolution.requery_limit == 0 {
            return fail("resolution.requery_limit", "must be greater than 0");
        }

        let r = &self.repository;
        if r.query_timeout_ms == 0 {
            return fail("repository.query_timeout_ms", "must be greater than 0");
        }
        if r.read_pool_size == 0 {
            return fail("repository.read_pool_size", "must be greater than 0");
        }

        for (name, category) in &self.categories {
            let field: IntentField = match name.parse() {
                Ok(field) => field,
                Err(_) => return fail(&format!("categories.{name}"), "unknown intent field"),
            };
            if field.is_multi_valued() {
                return fail(
                    &format!("categories.{name}"),
                    "injected keywords search across categories",
                );
            }
            if category.trim().is_empty() {
                return fail(&format!("categories.{name}"), "must not be empty");
            }
        }
        Ok(())
    }

    /// Repository category queried for `field`.
    pub fn category_for(&self, field: IntentField) -> Option<String> {
        field.default_category()?;
        self.categories
            .get(field.name())
            .cloned()
            .or_else(|| field.default_category().map(str::to_string))
    }

    pub fn keyword_vocabulary(&self) -> KeywordVocabulary {
        KeywordVocabulary::new(self.vocabulary.clone())
    }

    fn apply_env_overrides(config: &mut TesseraConfig) {
        if let Ok(val) = std::env::var("TESSERA_DB_PATH") {
            config.repository.db_path = val;
        }
        if let Ok(val) = std::env::var("TESSERA_QUERY_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.repository.query_timeout_ms = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_READ_POOL_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.repository.read_pool_size = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_RULES_PATH") {
            config.rules.path = Some(val);
        }
        if let Ok(val) = std::env::var("TESSERA_MODE") {
            if let Ok(v) = val.parse() {
                config.composition.default_mode = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_MAX_CHARS") {
            if let Ok(v) = val.parse::<usize>() {
                config.composition.max_chars = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_MAX_FRAGMENTS") {
            if let Ok(v) = val.parse::<usize>() {
                config.composition.max_fragments = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_RELEVANCE_WEIGHT") {
            if let Ok(v) = val.parse::<f64>() {
                config.selection.relevance_weight = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_QUALITY_WEIGHT") {
            if let Ok(v) = val.parse::<f64>() {
                config.selection.quality_weight = v;
            }
        }
        if let Ok(val) = std::env::var("TESSERA_LOG_LEVEL") {
            config.observability.log_level = val;
        }
        if let Ok(val) = std::env::var("TESSERA_LOG_JSON") {
            if let Ok(v) = val.parse::<bool>() {
                config.observability.json_logs = v;
            }
        }
    }
}
