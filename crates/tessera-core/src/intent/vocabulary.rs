//! Attribute-code → keyword-phrase vocabulary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FieldRequest, IntentField};
use crate::text;

/// Maps attribute codes to the phrases expected to represent them.
///
/// Keys are either a bare code (`ancient`) or a field-qualified code
/// (`era.ancient`); the qualified form wins when both exist. Codes without
/// an entry fall back to their phrase form (`modern_pop_idol` → `modern pop idol`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordVocabulary {
    entries: BTreeMap<String, Vec<String>>,
}

impl KeywordVocabulary {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| {
                let phrases = v
                    .iter()
                    .map(|p| text::normalize(p))
                    .filter(|p| !p.is_empty())
                    .collect();
                (k.trim().to_ascii_lowercase(), phrases)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Phrases expected in the composed text for `request` on `field`,
    /// primary phrase first. Empty for [`FieldRequest::Unspecified`].
    pub fn expected_phrases(&self, field: IntentField, request: &FieldRequest) -> Vec<String> {
        match request {
            FieldRequest::Code(code) => {
                let qualified = format!("{}.{}", field.name(), code.as_str());
                let mut phrases = self
                    .entries
                    .get(&qualified)
                    .or_else(|| self.entries.get(code.as_str()))
                    .cloned()
                    .unwrap_or_default();
                let fallback = code.phrase();
                if !phrases.contains(&fallback) {
                    phrases.push(fallback);
                }
                phrases
            }
            FieldRequest::Unspecified => Vec::new(),
            FieldRequest::Phrases(phrases) => phrases.clone(),
        }
    }

    /// Lowercase terms of the expected phrases, used for relevance scoring.
    pub fn expected_terms(&self, field: IntentField, request: &FieldRequest) -> Vec<String> {
        let phrases = self.expected_phrases(field, request);
        text::term_set(&phrases).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> KeywordVocabulary {
        let mut entries = BTreeMap::new();
        entries.insert("ancient".to_string(), vec!["Ancient".to_string(), "antiquity".to_string()]);
        entries.insert("era.ancient".to_string(), vec!["ancient era".to_string()]);
        KeywordVocabulary::new(entries)
    }

    #[test]
    fn qualified_entry_wins() {
        let req = FieldRequest::parse(IntentField::Era, "ancient").unwrap();
        assert_eq!(
            vocab().expected_phrases(IntentField::Era, &req),
            vec!["ancient era".to_string(), "ancient".to_string()]
        );
    }

    #[test]
    fn bare_entry_is_normalized() {
        let req = FieldRequest::parse(IntentField::Atmosphere, "ancient").unwrap();
        assert_eq!(
            vocab().expected_phrases(IntentField::Atmosphere, &req),
            vec!["ancient".to_string(), "antiquity".to_string()]
        );
    }

    #[test]
    fn unknown_code_falls_back_to_phrase_form() {
        let req = FieldRequest::parse(IntentField::Makeup, "modern_pop_idol").unwrap();
        assert_eq!(
            KeywordVocabulary::default().expected_phrases(IntentField::Makeup, &req),
            vec!["modern pop idol".to_string()]
        );
    }
}
