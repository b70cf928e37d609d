//! Conflict rule tables as data: TOML in, validated [`RuleTable`] out.

use std::path::Path;

use serde::Deserialize;
use tessera_core::errors::RuleError;
use tessera_core::models::{ConflictRule, RuleTable};
use tracing::info;

const BUILTIN_RULES: &str = include_str!("default_rules.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRuleTable {
    version: String,
    #[serde(default)]
    rules: Vec<ConflictRule>,
}

/// Parse and validate a rule table. `source_name` only labels errors.
pub fn parse_rules(toml_str: &str, source_name: &str) -> Result<RuleTable, RuleError> {
    let raw: RawRuleTable = toml::from_str(toml_str).map_err(|e| RuleError::ParseError {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    RuleTable::new(raw.version, raw.rules)
}

/// Load a rule table from a TOML file.
pub fn load_rules(path: &Path) -> Result<RuleTable, RuleError> {
    let content = std::fs::read_to_string(path).map_err(|e| RuleError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let table = parse_rules(&content, &path.display().to_string())?;
    info!(
        path = %path.display(),
        version = table.version(),
        rules = table.len(),
        "rule table loaded"
    );
    Ok(table)
}

/// The table shipped with the crate.
pub fn builtin_rules() -> Result<RuleTable, RuleError> {
    parse_rules(BUILTIN_RULES, "builtin")
}
