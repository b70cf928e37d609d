//! Selector tests against the portrait fixture library.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tessera_core::config::{SelectionConfig, TesseraConfig};
use tessera_core::errors::{Advisory, RepositoryError, TesseraError};
use tessera_core::intent::{Intent, IntentField, KeywordVocabulary};
use tessera_core::models::{Element, NaturalKey};
use tessera_core::traits::{ElementQuery, IElementRepository};
use tessera_core::RepositoryHandle;
use tessera_selection::Selector;
use tessera_storage::InMemoryRepository;

fn handle() -> RepositoryHandle {
    let elements: Vec<Element> = test_fixtures::portrait_library();
    let repo = InMemoryRepository::with_elements(&elements).unwrap();
    RepositoryHandle::new(Arc::new(repo), Duration::from_secs(1))
}

fn selector() -> Selector {
    Selector::new(SelectionConfig::default(), KeywordVocabulary::default())
}

fn primary_name(outcome: &tessera_selection::SelectionOutcome, field: IntentField) -> Option<String> {
    outcome.selection.primary(field).map(|e| e.key.name.clone())
}

/// Times out for the listed categories, answers from `inner` otherwise.
struct SlowCategories {
    inner: InMemoryRepository,
    slow: BTreeSet<&'static str>,
}

impl IElementRepository for SlowCategories {
    fn query(&self, query: &ElementQuery) -> Result<Vec<Element>, RepositoryError> {
        match query.category.as_deref() {
            Some(c) if self.slow.contains(c) => Err(RepositoryError::Timeout { elapsed_ms: 5 }),
            _ => self.inner.query(query),
        }
    }

    fn library_version(&self) -> Result<String, RepositoryError> {
        self.inner.library_version()
    }
}

struct Unreachable;

impl IElementRepository for Unreachable {
    fn query(&self, _query: &ElementQuery) -> Result<Vec<Element>, RepositoryError> {
        Err(RepositoryError::Unavailable {
            reason: "connection refused".to_string(),
        })
    }

    fn library_version(&self) -> Result<String, RepositoryError> {
        Ok("7".to_string())
    }
}

fn slow_handle(slow: &[&'static str]) -> RepositoryHandle {
    let elements: Vec<Element> = test_fixtures::portrait_library();
    let repo = SlowCategories {
        inner: InMemoryRepository::with_elements(&elements).unwrap(),
        slow: slow.iter().copied().collect(),
    };
    RepositoryHandle::new(Arc::new(repo), Duration::from_millis(10))
}

#[test]
fn requested_codes_pick_their_matching_elements() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("full_portrait");
    let outcome = selector().select(&intent, &scope).unwrap();

    assert_eq!(primary_name(&outcome, IntentField::Era).as_deref(), Some("ancient"));
    assert_eq!(primary_name(&outcome, IntentField::Makeup).as_deref(), Some("traditional_court"));
    assert_eq!(primary_name(&outcome, IntentField::Clothing).as_deref(), Some("hanfu"));
    assert_eq!(
        primary_name(&outcome, IntentField::LightingType).as_deref(),
        Some("soft_window_light")
    );
    assert!(outcome.advisories.is_empty(), "{:?}", outcome.advisories);
}

#[test]
fn unspecified_field_prefers_quality() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("scenario_a_ancient_unset_makeup");
    let outcome = selector().select(&intent, &scope).unwrap();
    assert_eq!(primary_name(&outcome, IntentField::Makeup).as_deref(), Some("modern_pop_idol"));
}

#[test]
fn empty_category_yields_no_candidates_advisory() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("scenario_b_missing_category");
    let outcome = selector().select(&intent, &scope).unwrap();

    let entry = outcome.selection.get(IntentField::AgeBracket).unwrap();
    assert!(entry.is_empty());
    assert_eq!(
        outcome.advisories,
        vec![Advisory::NoCandidates {
            field: IntentField::AgeBracket
        }]
    );
    assert!(outcome.selection.primary(IntentField::Gender).is_some());
}

#[test]
fn injected_keywords_skip_covered_categories() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    // "traditional" matches hanfu, traditional_court and ink_wash_painting;
    // clothing is requested so hanfu is excluded from keyword results.
    let intent = Intent::builder("portrait")
        .field(IntentField::Clothing, "streetwear")
        .keyword("traditional")
        .build()
        .unwrap();
    let outcome = selector().select(&intent, &scope).unwrap();
    let keywords: Vec<_> = outcome
        .selection
        .get(IntentField::Keywords)
        .unwrap()
        .elements()
        .map(|e| e.key.name.clone())
        .collect();
    assert!(!keywords.contains(&"hanfu".to_string()), "{keywords:?}");
    assert!(keywords.contains(&"traditional_court".to_string()));
    assert!(keywords.len() <= SelectionConfig::default().keyword_top_n);
}

#[test]
fn keyword_candidates_below_floor_are_dropped() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    let intent = Intent::builder("portrait").keyword("side profile").build().unwrap();
    let config = SelectionConfig {
        keyword_relevance_floor: 1.0,
        ..Default::default()
    };
    let outcome = Selector::new(config, KeywordVocabulary::default())
        .select(&intent, &scope)
        .unwrap();
    let names: Vec<_> = outcome
        .selection
        .get(IntentField::Keywords)
        .unwrap()
        .elements()
        .map(|e| e.key.name.clone())
        .collect();
    // side_profile's terms are exactly {side, profile}.
    assert_eq!(names, vec!["side_profile".to_string()]);
}

#[test]
fn each_injected_phrase_keeps_its_exact_match() {
    let elements = vec![
        Element::new(NaturalKey::new("scene", "weather", "rain"), "falling rain", 6.0)
            .with_keywords(["rain"]),
        Element::new(NaturalKey::new("scene", "lighting", "moonlight"), "soft moonlight", 6.0)
            .with_keywords(["moonlight"]),
        Element::new(NaturalKey::new("scene", "pose", "side_profile"), "side profile view", 6.0)
            .with_keywords(["side profile"]),
        Element::new(NaturalKey::new("scene", "props", "paper_umbrella"), "oil paper umbrella", 6.0)
            .with_keywords(["paper umbrella"]),
    ];
    let repo = InMemoryRepository::with_elements(&elements).unwrap();
    let handle = RepositoryHandle::new(Arc::new(repo), Duration::from_secs(1));
    let selector = Selector::new(
        SelectionConfig {
            keyword_top_n: 4,
            ..Default::default()
        },
        KeywordVocabulary::default(),
    );
    let keyword_names = |phrases: &[&str]| -> BTreeSet<String> {
        let mut builder = Intent::builder("scene");
        for phrase in phrases {
            builder = builder.keyword(*phrase);
        }
        let scope = handle.begin_request().unwrap();
        selector
            .select(&builder.build().unwrap(), &scope)
            .unwrap()
            .selection
            .get(IntentField::Keywords)
            .unwrap()
            .elements()
            .map(|e| e.key.name.clone())
            .collect()
    };

    assert_eq!(keyword_names(&["rain"]), BTreeSet::from(["rain".to_string()]));
    let all = keyword_names(&["rain", "moonlight", "side profile", "paper umbrella"]);
    assert_eq!(
        all,
        ["rain", "moonlight", "side_profile", "paper_umbrella"]
            .into_iter()
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
    );
}

#[test]
fn natural_keys_are_never_selected_twice() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    // Both fields are pointed at the makeup category.
    let intent = Intent::builder("portrait")
        .unspecified(IntentField::Makeup)
        .unspecified(IntentField::Hairstyle)
        .build()
        .unwrap();
    let outcome = selector()
        .with_category(IntentField::Hairstyle, "makeup")
        .select(&intent, &scope)
        .unwrap();
    let hair = outcome.selection.primary(IntentField::Hairstyle).unwrap();
    let makeup = outcome.selection.primary(IntentField::Makeup).unwrap();
    assert_ne!(hair.key, makeup.key);
}

#[test]
fn selected_keys_were_issued_to_the_request() {
    let handle = handle();
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("full_portrait");
    let outcome = selector().select(&intent, &scope).unwrap();
    let frozen = outcome.selection.freeze();
    scope.verify(frozen.keys()).unwrap();
    assert_eq!(scope.query_count(), intent.fields().len());
}

#[test]
fn selection_is_deterministic() {
    let handle = handle();
    let intent: Intent = test_fixtures::intent("full_portrait");
    let first = {
        let scope = handle.begin_request().unwrap();
        selector().select(&intent, &scope).unwrap().selection
    };
    for _ in 0..5 {
        let scope = handle.begin_request().unwrap();
        assert_eq!(selector().select(&intent, &scope).unwrap().selection, first);
    }
}

#[test]
fn ties_break_on_quality_then_natural_key() {
    let elements = vec![
        Element::new(NaturalKey::new("portrait", "era", "b_era"), "era b", 5.0),
        Element::new(NaturalKey::new("portrait", "era", "a_era"), "era a", 5.0),
        Element::new(NaturalKey::new("portrait", "era", "c_era"), "era c", 4.0),
    ];
    let repo = InMemoryRepository::with_elements(&elements).unwrap();
    let handle = RepositoryHandle::new(Arc::new(repo), Duration::from_secs(1));
    let scope = handle.begin_request().unwrap();
    let intent = Intent::builder("portrait").unspecified(IntentField::Era).build().unwrap();
    let outcome = selector().select(&intent, &scope).unwrap();
    assert_eq!(primary_name(&outcome, IntentField::Era).as_deref(), Some("a_era"));
}

#[test]
fn timed_out_field_degrades_to_advisory() {
    let handle = slow_handle(&["makeup"]);
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("scenario_a_ancient_unset_makeup");
    let outcome = selector().select(&intent, &scope).unwrap();
    assert!(outcome.selection.get(IntentField::Makeup).unwrap().is_empty());
    assert!(matches!(
        outcome.advisories.as_slice(),
        [Advisory::QueryTimedOut {
            field: IntentField::Makeup,
            ..
        }]
    ));
    assert_eq!(scope.timeout_count(), 1);
}

#[test]
fn every_field_timing_out_is_fatal() {
    let handle = slow_handle(&["era", "makeup"]);
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("scenario_a_ancient_unset_makeup");
    let err = selector().select(&intent, &scope).unwrap_err();
    assert!(matches!(err, TesseraError::RepositoryUnavailable { .. }), "{err}");
}

#[test]
fn unreachable_repository_is_fatal_immediately() {
    let handle = RepositoryHandle::new(Arc::new(Unreachable), Duration::from_secs(1));
    let scope = handle.begin_request().unwrap();
    let intent: Intent = test_fixtures::intent("full_portrait");
    let err = selector().select(&intent, &scope).unwrap_err();
    assert!(matches!(err, TesseraError::RepositoryUnavailable { .. }));
    assert_eq!(scope.query_count(), 1);
}

#[test]
fn category_overrides_come_from_config() {
    let config = TesseraConfig::from_toml(
        r#"
        [categories]
        makeup = "cosmetics"
        "#,
    )
    .unwrap();
    let selector = Selector::from_config(&config);
    assert_eq!(selector.category_for(IntentField::Makeup), Some("cosmetics"));
    assert_eq!(selector.category_for(IntentField::Era), Some("era"));
    assert_eq!(selector.category_for(IntentField::Keywords), None);
}
