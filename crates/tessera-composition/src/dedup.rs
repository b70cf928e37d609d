//! Cross-fragment phrase de-duplication.
//!
//! Fragments are visited in text order. Each comma-separated phrase of a
//! fragment is dropped when earlier emitted text already contains it on word
//! boundaries, case-insensitively. Only later fragments ever lose wording.

use tessera_core::text;

/// Running record of the text emitted so far.
#[derive(Debug, Default)]
pub struct PhraseLedger {
    emitted: Vec<String>,
}

impl PhraseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `phrase` is already present in emitted text.
    pub fn contains(&self, phrase: &str) -> bool {
        self.emitted.iter().any(|e| text::contains_phrase(e, phrase))
    }

    /// Strip already-emitted phrases from `fragment` and record what is left.
    /// Returns `None` when nothing survives.
    pub fn admit(&mut self, fragment: &str) -> Option<String> {
        let phrases = text::split_phrases(fragment);
        let mut kept: Vec<&str> = Vec::with_capacity(phrases.len());
        for phrase in phrases.iter().copied() {
            if self.contains(phrase) || kept.iter().any(|k| text::contains_phrase(k, phrase)) {
                continue;
            }
            kept.push(phrase);
        }
        if kept.is_empty() {
            return None;
        }

        let out = if kept.len() == phrases.len() {
            fragment.trim().to_string()
        } else {
            kept.join(", ")
        };
        self.emitted.push(out.clone());
        Some(out)
    }
}
