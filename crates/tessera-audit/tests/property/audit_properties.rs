//! Property tests for the completeness audit.

use proptest::prelude::*;
use tessera_audit::CompletenessAuditor;
use tessera_composition::{ComposeContext, Composer};
use tessera_core::config::TesseraConfig;
use tessera_core::intent::{Intent, IntentField};
use tessera_core::models::{
    Choice, CompletenessGap, CompositionResult, Element, FieldSelection, NaturalKey, SelectionSet,
    VerbosityMode,
};
use uuid::Uuid;

/// Requestable fields with a code, `*` meaning unspecified.
const REQUESTS: &[(IntentField, &str)] = &[
    (IntentField::Gender, "female"),
    (IntentField::Ethnicity, "east_asian"),
    (IntentField::AgeBracket, "elderly"),
    (IntentField::Clothing, "hanfu"),
    (IntentField::Makeup, "*"),
    (IntentField::Era, "ancient"),
    (IntentField::Atmosphere, "festive"),
    (IntentField::LightingType, "neon_rim_light"),
    (IntentField::ArtStyle, "*"),
];

fn config() -> TesseraConfig {
    TesseraConfig::from_toml(&test_fixtures::config_text("portrait")).unwrap()
}

fn find(category: &str, name: &str) -> Element {
    let library: Vec<Element> = test_fixtures::portrait_library();
    library
        .into_iter()
        .find(|e| e.key == NaturalKey::new("portrait", category, name))
        .unwrap_or_else(|| panic!("fixture element {category}/{name} missing"))
}

/// One fixed composition: some fields match the requests, some do not, some
/// are missing entirely.
fn fixed_result(mode: VerbosityMode) -> CompositionResult {
    let mut set = SelectionSet::new();
    for (field, category, name) in [
        (IntentField::Gender, "gender", "female"),
        (IntentField::Clothing, "clothing", "streetwear"),
        (IntentField::Makeup, "makeup", "natural_look"),
        (IntentField::Era, "era", "ancient"),
        (IntentField::LightingType, "lighting", "soft_window_light"),
    ] {
        set.insert(FieldSelection {
            field,
            category: Some(category.to_string()),
            choices: vec![Choice {
                element: find(category, name),
                relevance: 0.5,
                score: 0.5,
            }],
        })
        .unwrap();
    }
    Composer::from_config(&config()).compose(set.freeze(), mode, ComposeContext::new(Uuid::nil(), "1"))
}

fn build(requests: &[(IntentField, &str)]) -> Intent {
    let mut builder = Intent::builder("portrait");
    for (field, code) in requests {
        builder = if *code == "*" {
            builder.unspecified(*field)
        } else {
            builder.field(*field, *code)
        };
    }
    builder.build().unwrap()
}

fn without_field(gaps: &[CompletenessGap], field: IntentField) -> Vec<CompletenessGap> {
    gaps.iter().filter(|g| g.field != field).cloned().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dropping_a_field_never_hurts_the_others(
        requests in prop::sample::subsequence(REQUESTS.to_vec(), 2..=REQUESTS.len()),
        pick in any::<prop::sample::Index>(),
        mode in prop::sample::select(vec![VerbosityMode::Simple, VerbosityMode::Detailed, VerbosityMode::Auto]),
    ) {
        let auditor = CompletenessAuditor::from_config(&config());
        let result = fixed_result(mode);
        let intent = build(&requests);
        let removed = requests[pick.index(requests.len())].0;
        let reduced = intent.without(removed).unwrap();

        let full = auditor.audit(&intent, &result);
        let fewer = auditor.audit(&reduced, &result);
        prop_assert!(fewer.len() <= full.len());
        prop_assert_eq!(fewer, without_field(&full, removed));
    }

    #[test]
    fn every_gap_names_a_requested_field(
        requests in prop::sample::subsequence(REQUESTS.to_vec(), 1..=REQUESTS.len()),
    ) {
        let auditor = CompletenessAuditor::from_config(&config());
        let intent = build(&requests);
        let gaps = auditor.audit(&intent, &fixed_result(VerbosityMode::Auto));
        prop_assert!(gaps.len() <= requests.len());
        for gap in &gaps {
            prop_assert!(intent.is_requested(gap.field));
            prop_assert!(!gap.suggestion.is_empty());
        }
    }
}
