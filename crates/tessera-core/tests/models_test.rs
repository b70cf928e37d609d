use std::collections::BTreeSet;

use tessera_core::errors::{RuleError, TesseraError};
use tessera_core::intent::IntentField;
use tessera_core::models::*;

fn element(category: &str, name: &str, template: &str) -> Element {
    Element::new(NaturalKey::new("portrait", category, name), template, 7.0)
}

fn choice(e: Element) -> Choice {
    Choice {
        element: e,
        relevance: 0.5,
        score: 0.5,
    }
}

#[test]
fn element_deserializes_with_flattened_key() {
    let json = r#"{
        "domain": "portrait",
        "category": "makeup",
        "name": "traditional_court",
        "template": "traditional court makeup",
        "keywords": ["traditional", "court"],
        "quality": 8.5
    }"#;
    let e: Element = serde_json::from_str(json).unwrap();
    assert_eq!(e.key.to_string(), "portrait/makeup/traditional_court");
    assert_eq!(e.normalized_quality(), 0.85);
    assert!(e.validate().is_ok());
}

#[test]
fn short_template_falls_back_to_localized_name_then_name() {
    let e = element("hairstyle", "bob_cut", "x");
    assert_eq!(e.render_template(), "bob_cut");
    let e = e.with_localized_name("bob cut");
    assert_eq!(e.render_template(), "bob cut");
}

#[test]
fn out_of_range_quality_is_invalid() {
    let mut e = element("era", "ancient", "ancient era");
    e.quality = 11.0;
    assert!(e.validate().is_err());
}

#[test]
fn attribute_tokens_include_name_and_keywords() {
    let e = element("makeup", "Modern_Pop_Idol", "idol makeup")
        .with_keywords(["Glitter", "idol", "glitter"]);
    assert_eq!(e.attribute_tokens(), vec!["modern_pop_idol", "glitter", "idol"]);
}

#[test]
fn selection_set_rejects_duplicate_natural_keys() {
    let mut set = SelectionSet::new();
    set.insert(FieldSelection {
        field: IntentField::Era,
        category: Some("era".into()),
        choices: vec![choice(element("era", "ancient", "ancient era"))],
    })
    .unwrap();

    let err = set
        .insert(FieldSelection {
            field: IntentField::Atmosphere,
            category: Some("era".into()),
            choices: vec![choice(element("era", "ancient", "ancient era"))],
        })
        .unwrap_err();
    assert!(matches!(err, TesseraError::DuplicateSelection { .. }));
    assert_eq!(set.element_count(), 1);
}

#[test]
fn replacing_a_choice_releases_old_key() {
    let mut set = SelectionSet::new();
    set.insert(FieldSelection {
        field: IntentField::Makeup,
        category: Some("makeup".into()),
        choices: vec![choice(element("makeup", "modern_pop_idol", "idol makeup"))],
    })
    .unwrap();

    let idol = NaturalKey::new("portrait", "makeup", "modern_pop_idol");
    let old = set
        .replace_choice(
            IntentField::Makeup,
            &idol,
            choice(element("makeup", "traditional_court", "court makeup")),
        )
        .unwrap()
        .unwrap();
    assert_eq!(old.element.name(), "modern_pop_idol");
    assert!(!set.contains_key(&old.element.key));
    assert_eq!(set.primary(IntentField::Makeup).unwrap().name(), "traditional_court");

    let missing = set
        .replace_choice(
            IntentField::Makeup,
            &idol,
            choice(element("makeup", "natural_look", "natural look")),
        )
        .unwrap();
    assert!(missing.is_none());

    let frozen = set.freeze();
    assert_eq!(frozen.keys().len(), 1);
}

fn predicate(field: IntentField, values: &[&str]) -> Predicate {
    Predicate {
        field,
        any_of: values.iter().map(|v| v.to_string()).collect::<BTreeSet<_>>(),
    }
}

#[test]
fn rule_table_lowercases_predicate_values() {
    let table = RuleTable::new(
        "1",
        vec![ConflictRule {
            id: "era-makeup".into(),
            severity: Severity::Blocking,
            description: String::new(),
            yields: Some(IntentField::Makeup),
            when: vec![
                predicate(IntentField::Era, &["Ancient"]),
                predicate(IntentField::Makeup, &["modern_pop_idol"]),
            ],
        }],
    )
    .unwrap();
    let rule = table.rule("era-makeup").unwrap();
    assert!(rule.predicate(IntentField::Era).unwrap().matches(&["ancient"]));
}

#[test]
fn rule_with_one_predicate_is_rejected() {
    let err = RuleTable::new(
        "1",
        vec![ConflictRule {
            id: "solo".into(),
            severity: Severity::Warning,
            description: String::new(),
            yields: None,
            when: vec![predicate(IntentField::Era, &["ancient"])],
        }],
    )
    .unwrap_err();
    assert_eq!(
        err,
        RuleError::TooFewPredicates {
            id: "solo".into(),
            count: 1
        }
    );
}

#[test]
fn rule_yielding_unnamed_field_is_rejected() {
    let err = RuleTable::new(
        "1",
        vec![ConflictRule {
            id: "bad-yield".into(),
            severity: Severity::Warning,
            description: String::new(),
            yields: Some(IntentField::Hairstyle),
            when: vec![
                predicate(IntentField::Era, &["ancient"]),
                predicate(IntentField::Makeup, &["glitter"]),
            ],
        }],
    )
    .unwrap_err();
    assert!(matches!(err, RuleError::YieldsNotInRule { .. }));
}

#[test]
fn severity_orders_blocking_above_warning() {
    assert!(Severity::Blocking > Severity::Warning);
}

#[test]
fn verbosity_mode_parses_case_insensitively() {
    assert_eq!("DETAILED".parse::<VerbosityMode>().unwrap(), VerbosityMode::Detailed);
    assert!("verbose".parse::<VerbosityMode>().is_err());
    assert_eq!(VerbosityMode::default(), VerbosityMode::Auto);
}
