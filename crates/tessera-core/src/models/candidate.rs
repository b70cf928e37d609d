use serde::Serialize;

use super::Element;

/// An element paired with its relevance to one intent field.
/// Lives only for the duration of a single selection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub element: Element,
    /// Relevance in `[0, 1]`.
    pub relevance: f64,
}

impl Candidate {
    pub fn new(element: Element, relevance: f64) -> Self {
        Self {
            element,
            relevance: relevance.clamp(0.0, 1.0),
        }
    }
}
