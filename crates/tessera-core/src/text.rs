//! Text normalisation and word-boundary phrase matching shared by the
//! scorer, composer and auditor.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TERM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Lowercase, trim and collapse internal whitespace.
pub fn normalize(s: &str) -> String {
    WHITESPACE
        .replace_all(s.trim(), " ")
        .to_lowercase()
}

/// Lowercase alphanumeric terms, in order of first appearance, deduplicated.
pub fn terms(s: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    TERM.find_iter(&s.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Term set of several phrases at once.
pub fn term_set<S: AsRef<str>>(phrases: &[S]) -> BTreeSet<String> {
    phrases
        .iter()
        .flat_map(|p| terms(p.as_ref()))
        .collect()
}

/// Split a fragment into its comma-separated phrases, trimmed, empties dropped.
pub fn split_phrases(s: &str) -> Vec<&str> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Case-insensitive containment of `needle` in `haystack` on word boundaries:
/// `"black hair"` is found in `"short black hair"` but `"hair"` is not found
/// in `"hairpin"`.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    if needle.is_empty() {
        return false;
    }
    let hay = normalize(haystack);
    let mut start = 0;
    while let Some(pos) = hay[start..].find(&needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let left_ok = hay[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let right_ok = hay[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if left_ok && right_ok {
            return true;
        }
        // Advance by one char past the failed match start.
        start = begin + hay[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}
