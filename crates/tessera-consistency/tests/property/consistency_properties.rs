//! Property tests for the checker and resolver.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tessera_consistency::{builtin_rules, ConflictResolver, ConsistencyChecker};
use tessera_core::config::SelectionConfig;
use tessera_core::intent::{DominanceOrder, Intent, IntentField, KeywordVocabulary};
use tessera_core::models::{Element, NaturalKey};
use tessera_core::RepositoryHandle;
use tessera_selection::Selector;
use tessera_storage::InMemoryRepository;

const TOKENS: &[&str] = &[
    "ancient",
    "dynasty",
    "modern",
    "idol",
    "glitter",
    "streetwear",
    "hoodie",
    "hanfu",
    "undercut",
    "court",
];

fn arb_element() -> impl Strategy<Value = Element> {
    (
        prop::sample::select(vec!["era", "makeup", "clothing", "hairstyle"]),
        "[a-d]{1,2}",
        0.0f64..=10.0,
        prop::collection::vec(prop::sample::select(TOKENS.to_vec()), 0..3),
    )
        .prop_map(|(category, name, quality, keywords)| {
            Element::new(
                NaturalKey::new("portrait", category, name.clone()),
                format!("{category} {name} look"),
                quality,
            )
            .with_keywords(keywords)
        })
}

fn library() -> impl Strategy<Value = Vec<Element>> {
    prop::collection::vec(arb_element(), 1..24).prop_map(|elements| {
        let mut seen = BTreeSet::new();
        elements
            .into_iter()
            .filter(|e| seen.insert(e.key.clone()))
            .collect()
    })
}

fn intent() -> Intent {
    Intent::builder("portrait")
        .field(IntentField::Era, "ancient")
        .unspecified(IntentField::Makeup)
        .unspecified(IntentField::Clothing)
        .unspecified(IntentField::Hairstyle)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn remaining_blocking_issues_are_reported(elements in library()) {
        let repo = InMemoryRepository::with_elements(&elements).unwrap();
        let handle = RepositoryHandle::new(Arc::new(repo), Duration::from_secs(1));
        let scope = handle.begin_request().unwrap();
        let rules = builtin_rules().unwrap();
        let intent = intent();
        let selector = Selector::new(SelectionConfig::default(), KeywordVocabulary::default());
        let checker = ConsistencyChecker::new();

        let selected = selector.select(&intent, &scope).unwrap().selection;
        let issues = checker.check(&rules, &intent, &selected);
        let outcome = ConflictResolver::new(DominanceOrder::default(), 24)
            .resolve(&selector, &rules, &intent, selected, issues, &scope)
            .unwrap();

        let reported: BTreeSet<_> = outcome
            .unresolved
            .iter()
            .map(|u| u.issue.dedup_key())
            .collect();
        for issue in checker.check(&rules, &intent, &outcome.selection) {
            if issue.is_blocking() {
                prop_assert!(reported.contains(&issue.dedup_key()), "unreported: {:?}", issue);
            }
        }

        let resolved_fields: Vec<_> = outcome.resolutions.iter().map(|r| r.field).collect();
        let distinct: BTreeSet<_> = resolved_fields.iter().collect();
        prop_assert_eq!(distinct.len(), resolved_fields.len());
        scope.verify(outcome.selection.freeze().keys()).unwrap();
    }

    #[test]
    fn checker_output_is_canonical(elements in library()) {
        let repo = InMemoryRepository::with_elements(&elements).unwrap();
        let handle = RepositoryHandle::new(Arc::new(repo), Duration::from_secs(1));
        let scope = handle.begin_request().unwrap();
        let rules = builtin_rules().unwrap();
        let intent = intent();
        let selector = Selector::new(SelectionConfig::default(), KeywordVocabulary::default());
        let selection = selector.select(&intent, &scope).unwrap().selection;

        let checker = ConsistencyChecker::new();
        let issues = checker.check(&rules, &intent, &selection);
        prop_assert_eq!(&issues, &checker.check(&rules, &intent, &selection));

        let mut keys = BTreeSet::new();
        for issue in &issues {
            prop_assert!(issue.first.field < issue.second.field);
            prop_assert!(keys.insert(issue.dedup_key()));
        }
        let first_warning = issues.iter().position(|i| !i.is_blocking()).unwrap_or(issues.len());
        prop_assert!(issues[first_warning..].iter().all(|i| !i.is_blocking()));
    }
}
