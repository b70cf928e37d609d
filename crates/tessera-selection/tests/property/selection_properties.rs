//! Property tests for scoring and selection.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tessera_core::config::SelectionConfig;
use tessera_core::intent::{Intent, IntentField, KeywordVocabulary};
use tessera_core::models::{Candidate, Element, NaturalKey};
use tessera_core::RepositoryHandle;
use tessera_selection::{rank_choices, Selector};
use tessera_storage::InMemoryRepository;

fn arb_element(category: &'static str) -> impl Strategy<Value = Element> {
    (
        "[a-e]{1,3}",
        0.0f64..=10.0,
        prop::collection::vec(prop::sample::select(vec!["ancient", "modern", "court", "idol"]), 0..4),
    )
        .prop_map(move |(name, quality, keywords)| {
            Element::new(
                NaturalKey::new("portrait", category, name.clone()),
                format!("{category} {name} template"),
                quality,
            )
            .with_keywords(keywords)
        })
}

fn unique(elements: Vec<Element>) -> Vec<Element> {
    let mut seen = BTreeSet::new();
    elements
        .into_iter()
        .filter(|e| seen.insert(e.key.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ranking_ignores_input_order(
        elements in prop::collection::vec(arb_element("makeup"), 1..12),
        relevances in prop::collection::vec(0.0f64..=1.0, 12),
    ) {
        let elements = unique(elements);
        let candidates: Vec<Candidate> = elements
            .iter()
            .zip(relevances.iter())
            .map(|(e, r)| Candidate::new(e.clone(), *r))
            .collect();
        let mut reversed = candidates.clone();
        reversed.reverse();

        let a = rank_choices(candidates, 0.6, 0.4);
        let b = rank_choices(reversed, 0.6, 0.4);
        let keys_a: Vec<_> = a.iter().map(|c| c.key().clone()).collect();
        let keys_b: Vec<_> = b.iter().map(|c| c.key().clone()).collect();
        prop_assert_eq!(keys_a, keys_b);
        for pair in a.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn selector_only_picks_returned_elements(
        makeup in prop::collection::vec(arb_element("makeup"), 0..8),
        era in prop::collection::vec(arb_element("era"), 0..8),
        code in prop::sample::select(vec!["ancient", "modern", "court"]),
    ) {
        let library: Vec<Element> = unique(makeup.into_iter().chain(era).collect());
        let repo = InMemoryRepository::with_elements(&library).unwrap();
        let handle = RepositoryHandle::new(Arc::new(repo), Duration::from_secs(1));
        let scope = handle.begin_request().unwrap();
        let intent = Intent::builder("portrait")
            .field(IntentField::Era, code)
            .unspecified(IntentField::Makeup)
            .build()
            .unwrap();

        let outcome = Selector::new(SelectionConfig::default(), KeywordVocabulary::default())
            .select(&intent, &scope)
            .unwrap();
        let frozen = outcome.selection.freeze();
        let keys = frozen.keys();
        prop_assert!(scope.verify(keys.iter().copied()).is_ok());

        let library_keys: BTreeSet<_> = library.iter().map(|e| &e.key).collect();
        for key in &keys {
            prop_assert!(library_keys.contains(key));
        }
        let distinct: BTreeSet<_> = keys.iter().collect();
        prop_assert_eq!(distinct.len(), keys.len());

        for field in [IntentField::Era, IntentField::Makeup] {
            let category = field.name();
            let available = library.iter().any(|e| e.key.category == category);
            prop_assert_eq!(frozen.primary(field).is_some(), available);
        }
    }
}
