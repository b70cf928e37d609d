//! Dominance order: which dimension wins when two selections clash, and which
//! fragments are dropped first when the composition is over budget.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Dimension, IntentField};

/// Ordered list of dimensions, most dominant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DominanceOrder {
    tiers: Vec<Dimension>,
}

impl DominanceOrder {
    /// Build from an explicit order. Returns `None` unless every dimension
    /// appears exactly once.
    pub fn new(tiers: Vec<Dimension>) -> Option<Self> {
        let order = Self { tiers };
        order.is_complete().then_some(order)
    }

    /// True when every dimension appears exactly once.
    pub fn is_complete(&self) -> bool {
        self.tiers.len() == Dimension::ALL.len()
            && Dimension::ALL
                .iter()
                .all(|d| self.tiers.iter().filter(|t| *t == d).count() == 1)
    }

    pub fn tiers(&self) -> &[Dimension] {
        &self.tiers
    }

    /// Tier index of a field (0 = most dominant).
    pub fn tier(&self, field: IntentField) -> usize {
        let dim = field.dimension();
        self.tiers
            .iter()
            .position(|d| *d == dim)
            .unwrap_or(self.tiers.len())
    }

    /// `Less` means `a` dominates `b`.
    pub fn compare(&self, a: IntentField, b: IntentField) -> Ordering {
        self.tier(a).cmp(&self.tier(b)).then(a.cmp(&b))
    }

    /// Returns `(dominant, subordinate)`.
    pub fn rank_pair(&self, a: IntentField, b: IntentField) -> (IntentField, IntentField) {
        if self.compare(a, b) == Ordering::Greater {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Sort fields most dominant first.
    pub fn sort(&self, fields: &mut [IntentField]) {
        fields.sort_by(|a, b| self.compare(*a, *b));
    }
}

impl Default for DominanceOrder {
    fn default() -> Self {
        Self {
            tiers: vec![
                Dimension::Subject,
                Dimension::Scene,
                Dimension::Styling,
                Dimension::Lighting,
                Dimension::VisualStyle,
                Dimension::Keywords,
            ],
        }
    }
}
