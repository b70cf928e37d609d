//! Length budget: drop the lowest-priority fragments until the text fits.

use tessera_core::models::Fragment;
use tracing::warn;

/// Fragment-count and character ceilings for one composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub max_fragments: usize,
    pub max_chars: usize,
}

impl Budget {
    /// Character length of `fragments` joined by `separator`.
    pub fn joined_len(fragments: &[Fragment], separator: &str) -> usize {
        let text: usize = fragments.iter().map(|f| f.text.chars().count()).sum();
        text + separator.chars().count() * fragments.len().saturating_sub(1)
    }

    pub fn fits(&self, fragments: &[Fragment], separator: &str) -> bool {
        fragments.len() <= self.max_fragments
            && Self::joined_len(fragments, separator) <= self.max_chars
    }

    /// Pop fragments off the tail until the budget holds, keeping at least
    /// one. `fragments` must be in priority order, most essential first.
    /// Returns the dropped fragments, highest priority first.
    ///
    /// A lone fragment longer than `max_chars` is kept whole and logged.
    pub fn truncate(&self, fragments: &mut Vec<Fragment>, separator: &str) -> Vec<Fragment> {
        let mut dropped = Vec::new();
        while fragments.len() > 1 && !self.fits(fragments, separator) {
            if let Some(last) = fragments.pop() {
                dropped.push(last);
            }
        }
        if let [only] = fragments.as_slice() {
            let chars = only.text.chars().count();
            if chars > self.max_chars {
                warn!(
                    field = %only.field,
                    element = %only.element,
                    chars,
                    max_chars = self.max_chars,
                    "single fragment exceeds the character budget, kept whole"
                );
            }
        }
        dropped.reverse();
        dropped
    }

    /// Whether `fragments` went out over the character ceiling. Only possible
    /// for a single fragment kept whole.
    pub fn is_overrun(&self, fragments: &[Fragment], separator: &str) -> bool {
        Self::joined_len(fragments, separator) > self.max_chars
    }
}
