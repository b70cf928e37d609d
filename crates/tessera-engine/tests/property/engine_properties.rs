//! Property tests for the whole pipeline over the portrait library.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use tessera_core::config::TesseraConfig;
use tessera_core::intent::{Intent, IntentField};
use tessera_core::models::{Element, Severity, VerbosityMode};
use tessera_engine::CompositionEngine;
use tessera_storage::InMemoryRepository;

/// Per field: codes the library has, codes it lacks, and `*`.
const CHOICES: &[(IntentField, &[&str])] = &[
    (IntentField::Gender, &["female", "male", "*"]),
    (IntentField::AgeBracket, &["elderly", "*"]),
    (IntentField::Clothing, &["hanfu", "streetwear", "*"]),
    (IntentField::Hairstyle, &["high_bun", "short_bob", "braids", "*"]),
    (IntentField::Makeup, &["modern_pop_idol", "traditional_court", "*"]),
    (IntentField::Era, &["ancient", "modern", "futuristic", "*"]),
    (IntentField::Atmosphere, &["serene", "festive", "*"]),
    (IntentField::LightingType, &["neon_rim_light", "soft_window_light", "*"]),
    (IntentField::ArtStyle, &["ink_wash_painting", "photorealistic", "*"]),
];

fn engine() -> CompositionEngine {
    let config = TesseraConfig::from_toml(&test_fixtures::config_text("portrait")).unwrap();
    let elements: Vec<Element> = test_fixtures::portrait_library();
    let repo = InMemoryRepository::with_elements(&elements).unwrap();
    CompositionEngine::new(config, Arc::new(repo)).unwrap()
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    let picks: Vec<_> = CHOICES
        .iter()
        .map(|(field, codes)| {
            let field = *field;
            let codes: Vec<&'static str> = codes.to_vec();
            prop::option::of(prop::sample::select(codes)).prop_map(move |c| (field, c))
        })
        .collect();
    (picks, prop::bool::ANY).prop_filter_map("nothing requested", |(picks, with_keyword)| {
        let mut builder = Intent::builder("portrait");
        for (field, code) in picks {
            builder = match code {
                Some("*") => builder.unspecified(field),
                Some(code) => builder.field(field, code),
                None => builder,
            };
        }
        if with_keyword {
            builder = builder.keyword("side profile");
        }
        builder.build().ok()
    })
}

fn arb_mode() -> impl Strategy<Value = VerbosityMode> {
    prop::sample::select(vec![VerbosityMode::Simple, VerbosityMode::Detailed, VerbosityMode::Auto])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn composition_is_deterministic(intent in arb_intent(), mode in arb_mode()) {
        let engine = engine();
        let a = engine.compose(&intent, Some(mode)).unwrap();
        let b = engine.compose(&intent, Some(mode)).unwrap();
        prop_assert_eq!(a.text(), b.text());
        prop_assert_eq!(a.gaps, b.gaps);
        prop_assert_eq!(a.advisories, b.advisories);
    }

    #[test]
    fn outcome_stays_within_budget_and_intent(intent in arb_intent(), mode in arb_mode()) {
        let engine = engine();
        let outcome = engine.compose(&intent, Some(mode)).unwrap();
        let composition = &engine.config().composition;

        let fragments = outcome.result.fragments();
        prop_assert!(fragments.len() <= composition.max_fragments.max(1));
        if fragments.len() > 1 {
            prop_assert!(outcome.text().chars().count() <= composition.max_chars);
        }
        for gap in &outcome.gaps {
            prop_assert!(intent.is_requested(gap.field));
        }
        for unresolved in outcome.result.unresolved() {
            prop_assert_eq!(unresolved.issue.severity, Severity::Blocking);
        }
        // Each field is resolved at most once.
        let mut resolved: Vec<_> = outcome.result.resolutions().iter().map(|r| r.field).collect();
        resolved.sort();
        resolved.dedup();
        prop_assert_eq!(resolved.len(), outcome.result.resolutions().len());
    }

    #[test]
    fn dropping_a_field_never_adds_gaps_elsewhere(
        intent in arb_intent(),
        mode in arb_mode(),
        pick in any::<prop::sample::Index>(),
    ) {
        let fields = intent.fields();
        let removed = fields[pick.index(fields.len())];
        let reduced = intent.without(removed);
        prop_assume!(reduced.is_ok());
        let reduced = reduced.unwrap();

        let engine = engine();
        let full = engine.compose(&intent, Some(mode)).unwrap();
        let fewer = engine.compose(&reduced, Some(mode)).unwrap();

        let remaining: BTreeSet<&str> = full
            .gaps
            .iter()
            .filter(|g| g.field != removed)
            .map(|g| g.requirement.as_str())
            .collect();
        for gap in &fewer.gaps {
            prop_assert_ne!(gap.field, removed);
            prop_assert!(
                remaining.contains(gap.requirement.as_str()),
                "{} appeared after dropping {}: {:?}",
                gap.requirement,
                removed,
                fewer.text()
            );
        }
        prop_assert!(fewer.gaps.len() <= remaining.len());
    }
}
