//! Per-element rendering for each verbosity mode.

use tessera_core::models::{Element, VerbosityMode};

/// More keywords than this switches `auto` to `detailed`.
pub const AUTO_DETAILED_MIN_KEYWORDS: usize = 2;

/// The concrete mode `mode` resolves to for `element`. Never `Auto`.
pub fn effective_mode(element: &Element, mode: VerbosityMode) -> VerbosityMode {
    match mode {
        VerbosityMode::Auto => {
            if element.normalized_keywords().len() > AUTO_DETAILED_MIN_KEYWORDS {
                VerbosityMode::Detailed
            } else {
                VerbosityMode::Simple
            }
        }
        concrete => concrete,
    }
}

/// Render `element` under `mode`, returning the text and the concrete mode.
///
/// `detailed` joins the first `keyword_limit` keywords; an element without
/// keywords renders its template instead.
pub fn render(element: &Element, mode: VerbosityMode, keyword_limit: usize) -> (String, VerbosityMode) {
    match effective_mode(element, mode) {
        VerbosityMode::Detailed => {
            let keywords: Vec<String> = element
                .normalized_keywords()
                .into_iter()
                .take(keyword_limit)
                .collect();
            if keywords.is_empty() {
                (simple(element), VerbosityMode::Simple)
            } else {
                (keywords.join(", "), VerbosityMode::Detailed)
            }
        }
        _ => (simple(element), VerbosityMode::Simple),
    }
}

fn simple(element: &Element) -> String {
    element.render_template().to_string()
}
