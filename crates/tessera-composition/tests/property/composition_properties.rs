//! Property tests for budget truncation and de-duplication.

use proptest::prelude::*;
use tessera_composition::{ComposeContext, Composer};
use tessera_core::config::CompositionConfig;
use tessera_core::intent::{Dimension, DominanceOrder, IntentField};
use tessera_core::models::{
    Choice, Element, FieldSelection, FrozenSelection, NaturalKey, SelectionSet, VerbosityMode,
};
use uuid::Uuid;

const WORDS: &[&str] = &[
    "silk", "black", "hair", "court", "misty", "neon", "glossy", "soft", "light", "ink",
];

fn arb_template() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(WORDS.to_vec()), 1..4),
        1..3,
    )
    .prop_map(|phrases| {
        phrases
            .into_iter()
            .map(|words| words.join(" "))
            .collect::<Vec<_>>()
            .join(", ")
    })
}

fn arb_selection() -> impl Strategy<Value = FrozenSelection> {
    prop::sample::subsequence(IntentField::ALL.to_vec(), 1..=IntentField::ALL.len())
        .prop_flat_map(|fields| {
            let n = fields.len();
            (Just(fields), prop::collection::vec(arb_template(), n))
        })
        .prop_map(|(fields, templates)| {
            let mut set = SelectionSet::new();
            for (field, template) in fields.into_iter().zip(templates) {
                let element = Element::new(
                    NaturalKey::new("portrait", field.name(), "el"),
                    template,
                    5.0,
                );
                set.insert(FieldSelection {
                    field,
                    category: Some(field.name().to_string()),
                    choices: vec![Choice {
                        element,
                        relevance: 0.5,
                        score: 0.5,
                    }],
                })
                .unwrap();
            }
            set.freeze()
        })
}

fn arb_dominance() -> impl Strategy<Value = DominanceOrder> {
    Just(Dimension::ALL.to_vec())
        .prop_shuffle()
        .prop_map(|tiers| DominanceOrder::new(tiers).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn truncation_only_drops_the_lowest_tiers(
        selection in arb_selection(),
        dominance in arb_dominance(),
        max_fragments in 0usize..8,
        max_chars in 0usize..120,
    ) {
        let config = CompositionConfig {
            max_fragments,
            max_chars,
            ..Default::default()
        };
        let composer = Composer::new(config.clone(), dominance.clone());
        let result = composer.compose(
            selection,
            VerbosityMode::Simple,
            ComposeContext::new(Uuid::nil(), "1"),
        );

        prop_assert!(!result.fragments().is_empty());
        if result.fragments().len() > 1 {
            prop_assert!(result.fragments().len() <= config.max_fragments);
            prop_assert!(result.text().chars().count() <= config.max_chars);
        }

        let kept_max = result
            .fragments()
            .iter()
            .map(|f| dominance.tier(f.field))
            .max()
            .unwrap_or(0);
        for dropped in result.truncated() {
            prop_assert!(dominance.tier(dropped.field) >= kept_max);
        }
    }

    #[test]
    fn no_phrase_is_emitted_twice(selection in arb_selection()) {
        let result = Composer::new(CompositionConfig::default(), DominanceOrder::default())
            .compose(selection, VerbosityMode::Simple, ComposeContext::new(Uuid::nil(), "1"));
        let fragments = result.fragments();
        for (i, later) in fragments.iter().enumerate() {
            for phrase in tessera_core::text::split_phrases(&later.text) {
                for earlier in &fragments[..i] {
                    prop_assert!(
                        !tessera_core::text::contains_phrase(&earlier.text, phrase),
                        "{:?} repeats {:?}",
                        later.text,
                        earlier.text
                    );
                }
            }
        }
    }

    #[test]
    fn same_inputs_same_text(selection in arb_selection(), dominance in arb_dominance()) {
        let composer = Composer::new(CompositionConfig::default(), dominance);
        let a = composer.compose(selection.clone(), VerbosityMode::Auto, ComposeContext::new(Uuid::nil(), "1"));
        let b = composer.compose(selection, VerbosityMode::Auto, ComposeContext::new(Uuid::nil(), "1"));
        prop_assert_eq!(a, b);
    }
}
