//! Property tests for the element stores.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tessera_core::config::RepositoryConfig;
use tessera_core::models::{Element, NaturalKey};
use tessera_core::traits::{ElementQuery, IElementCurator, IElementRepository};
use tessera_storage::{ElementStore, InMemoryRepository};

fn arb_element() -> impl Strategy<Value = Element> {
    (
        prop::sample::select(vec!["era", "makeup", "lighting"]),
        "[a-d]{1,2}",
        0.0f64..=10.0,
        prop::collection::vec(prop::sample::select(vec!["ancient", "modern", "neon", "soft"]), 0..3),
    )
        .prop_map(|(category, name, quality, keywords)| {
            Element::new(
                NaturalKey::new("portrait", category, name.clone()),
                format!("{category} template {name}"),
                quality,
            )
            .with_keywords(keywords)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn stored_keys_stay_unique(elements in prop::collection::vec(arb_element(), 1..24)) {
        let store = ElementStore::open_in_memory(&RepositoryConfig::default()).unwrap();
        let mut accepted = BTreeSet::new();
        for element in &elements {
            let inserted = store.insert_element(element).is_ok();
            prop_assert_eq!(inserted, accepted.insert(element.key.clone()));
        }
        prop_assert_eq!(store.count_elements().unwrap(), accepted.len());
    }

    #[test]
    fn query_honours_limit_and_backends_agree(
        elements in prop::collection::vec(arb_element(), 1..24),
        limit in 1usize..6,
        keyword in prop::sample::select(vec!["ancient", "modern", "neon", "soft"]),
    ) {
        let mut seen = BTreeSet::new();
        let unique: Vec<Element> = elements
            .into_iter()
            .filter(|e| seen.insert(e.key.clone()))
            .collect();

        let sqlite = ElementStore::open_in_memory(&RepositoryConfig::default()).unwrap();
        sqlite.insert_bulk(&unique).unwrap();
        let memory = InMemoryRepository::with_elements(&unique).unwrap();

        for category in [Some("era".to_string()), None] {
            let query = ElementQuery::new("portrait", category, limit)
                .with_keywords(vec![keyword.to_string()]);
            let a = sqlite.query(&query).unwrap();
            let b = memory.query(&query).unwrap();
            prop_assert!(a.len() <= limit);
            let keys_a: Vec<_> = a.iter().map(|e| &e.key).collect();
            let keys_b: Vec<_> = b.iter().map(|e| &e.key).collect();
            prop_assert_eq!(keys_a, keys_b);
        }
    }
}
