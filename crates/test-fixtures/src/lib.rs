//! Test fixture loader for tessera golden element libraries, intents and
//! rule tables.
//!
//! Fixtures live under `data/` inside this crate, so every crate in the
//! workspace resolves them through the same absolute path.

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_text(relative_path);
    let path = fixture_path(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as text (rule tables, config files).
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all files with `extension` in a fixture subdirectory, sorted.
pub fn list_fixtures(subdir: &str, extension: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path.extension().is_some_and(|ext| ext == extension) {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    files.sort();
    files
}

/// The portrait element library (plus one element from another domain).
pub fn portrait_library<T: DeserializeOwned>() -> Vec<T> {
    load_fixture("golden/libraries/portrait.json")
}

/// An intent fixture by file stem, e.g. `"full_portrait"`.
pub fn intent<T: DeserializeOwned>(name: &str) -> T {
    load_fixture(&format!("golden/intents/{name}.json"))
}

/// A rule-table fixture path by file stem.
pub fn rules_path(name: &str) -> PathBuf {
    fixture_path(&format!("golden/rules/{name}.toml"))
}

/// A config fixture path by file stem, e.g. `"portrait"`.
pub fn config_path(name: &str) -> PathBuf {
    fixture_path(&format!("golden/config/{name}.toml"))
}

/// A config fixture's TOML text.
pub fn config_text(name: &str) -> String {
    load_text(&format!("golden/config/{name}.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::intent::Intent;
    use tessera_core::models::Element;

    #[test]
    fn fixtures_root_exists() {
        assert!(fixtures_root().exists(), "fixture data directory not found");
    }

    #[test]
    fn portrait_library_parses_and_validates() {
        let elements: Vec<Element> = portrait_library();
        assert!(elements.len() >= 20);
        for e in &elements {
            e.validate()
                .unwrap_or_else(|err| panic!("invalid fixture element {}: {}", e.key, err));
        }
        assert!(elements
            .iter()
            .any(|e| e.key.category == "makeup" && e.key.name == "modern_pop_idol"));
    }

    #[test]
    fn valid_intents_parse() {
        for name in [
            "scenario_a_ancient_unset_makeup",
            "scenario_b_missing_category",
            "full_portrait",
            "ink_wash_unset_lighting",
            "pinned_conflict",
        ] {
            let _: Intent = intent(name);
        }
    }

    #[test]
    fn invalid_intent_is_rejected() {
        let raw = load_text("golden/intents/invalid_unknown_field.json");
        assert!(serde_json::from_str::<Intent>(&raw).is_err());
    }

    #[test]
    fn rule_tables_are_toml() {
        let files = list_fixtures("golden/rules", "toml");
        assert_eq!(files.len(), 2);
        for file in &files {
            let content = std::fs::read_to_string(file)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", file.display(), e));
            let _: toml::Value = toml::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", file.display(), e));
        }
    }

    #[test]
    fn portrait_config_parses() {
        let config = tessera_core::TesseraConfig::from_toml(&config_text("portrait")).unwrap();
        assert!(config.vocabulary.contains_key("female"));
        assert!(config_path("portrait").exists());
    }
}
