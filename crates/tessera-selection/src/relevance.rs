//! Relevance scorer: Jaccard overlap between a field's expected terms and a
//! candidate's terms, plus a bonus for an exact category match.
//!
//! Injected keywords are scored phrase by phrase: a candidate is as relevant
//! as its best-matching phrase, so adding phrases never dilutes a match.

use std::collections::BTreeSet;

use tessera_core::models::{Candidate, Element};
use tessera_core::text;

/// Scores raw repository results against one intent field.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer {
    category_bonus: f64,
}

impl RelevanceScorer {
    pub fn new(category_bonus: f64) -> Self {
        Self { category_bonus }
    }

    /// Relevance of `element` in `[0, 1]`.
    ///
    /// `expected_category` is the category the field was queried with; keyword
    /// injections pass `None` and never get the bonus.
    pub fn relevance(
        &self,
        expected_terms: &BTreeSet<String>,
        expected_category: Option<&str>,
        element: &Element,
    ) -> f64 {
        let overlap = jaccard(expected_terms, &element_terms(element));
        let bonus = match expected_category {
            Some(category) if category == element.category() => self.category_bonus,
            _ => 0.0,
        };
        (overlap + bonus).clamp(0.0, 1.0)
    }

    /// Highest relevance over several term groups. No groups scores like one
    /// empty group.
    pub fn best_relevance(
        &self,
        term_groups: &[BTreeSet<String>],
        expected_category: Option<&str>,
        element: &Element,
    ) -> f64 {
        if term_groups.is_empty() {
            return self.relevance(&BTreeSet::new(), expected_category, element);
        }
        term_groups
            .iter()
            .map(|terms| self.relevance(terms, expected_category, element))
            .fold(0.0, f64::max)
    }

    /// Annotate every element with its best relevance over `term_groups`.
    /// Empty in, empty out.
    pub fn score_all(
        &self,
        term_groups: &[BTreeSet<String>],
        expected_category: Option<&str>,
        elements: Vec<Element>,
    ) -> Vec<Candidate> {
        elements
            .into_iter()
            .map(|element| {
                let relevance = self.best_relevance(term_groups, expected_category, &element);
                Candidate::new(element, relevance)
            })
            .collect()
    }
}

/// Terms a candidate is compared on: its keywords and name, or its template
/// when it carries no keywords.
pub fn element_terms(element: &Element) -> BTreeSet<String> {
    let mut terms = text::term_set(&element.keywords);
    if terms.is_empty() {
        terms.extend(text::terms(&element.template));
    }
    terms.extend(text::terms(element.name()));
    terms
}

/// `|a ∩ b| / |a ∪ b|`, zero when both are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
