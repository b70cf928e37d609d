//! Requirements derived from an intent: what the composed text should show.

use std::collections::BTreeSet;

use tessera_core::intent::{FieldRequest, Intent, IntentField, KeywordVocabulary};
use tessera_core::text;

/// Expected terms shorter than this are too generic to count as evidence.
pub const MIN_EVIDENCE_TERM_CHARS: usize = 3;

/// One thing the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub field: IntentField,
    /// `era=ancient`, `makeup=*` or `keywords:"side profile"`.
    pub label: String,
    /// Expected phrases, primary first. Empty for an unspecified field.
    pub phrases: Vec<String>,
}

impl Requirement {
    /// Whether `text` carries any expected phrase, or any expected term of at
    /// least [`MIN_EVIDENCE_TERM_CHARS`], on word boundaries.
    pub fn is_evident_in(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text::contains_phrase(text, p))
            || self
                .evidence_terms()
                .iter()
                .any(|t| text::contains_phrase(text, t))
    }

    /// Expected phrases followed by their distinct qualifying terms.
    pub fn expected_keywords(&self) -> Vec<String> {
        let mut out = self.phrases.clone();
        for term in self.evidence_terms() {
            if !out.contains(&term) {
                out.push(term);
            }
        }
        out
    }

    pub fn is_unspecified(&self) -> bool {
        self.phrases.is_empty()
    }

    fn evidence_terms(&self) -> BTreeSet<String> {
        text::term_set(&self.phrases)
            .into_iter()
            .filter(|t| t.chars().count() >= MIN_EVIDENCE_TERM_CHARS)
            .collect()
    }
}

/// One requirement per requested structured field, in field order, then one
/// per injected keyword phrase.
pub fn requirements(intent: &Intent, vocabulary: &KeywordVocabulary) -> Vec<Requirement> {
    let mut out = Vec::new();
    for (field, request) in intent.requests() {
        match request {
            FieldRequest::Phrases(phrases) => {
                out.extend(phrases.iter().map(|p| Requirement {
                    field,
                    label: format!("{}:{p:?}", field.name()),
                    phrases: vec![p.clone()],
                }));
            }
            _ => out.push(Requirement {
                field,
                label: format!("{}={}", field.name(), request.to_raw()),
                phrases: vocabulary.expected_phrases(field, request),
            }),
        }
    }
    out
}
