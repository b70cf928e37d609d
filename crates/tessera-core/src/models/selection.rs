//! Per-request selections: mutable during resolution, frozen for composition.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{Element, NaturalKey};
use crate::errors::{TesseraError, TesseraResult};
use crate::intent::IntentField;

/// One chosen element with the scores that put it there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub element: Element,
    pub relevance: f64,
    pub score: f64,
}

impl Choice {
    pub fn key(&self) -> &NaturalKey {
        &self.element.key
    }
}

/// Everything chosen for one intent field. Empty `choices` means the field
/// was requested but nothing could be selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSelection {
    pub field: IntentField,
    /// Repository category the field was queried with (`None` for keyword search).
    pub category: Option<String>,
    pub choices: Vec<Choice>,
}

impl FieldSelection {
    pub fn primary(&self) -> Option<&Element> {
        self.choices.first().map(|c| &c.element)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.choices.iter().map(|c| &c.element)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Mapping from intent fields to chosen elements for a single request.
///
/// No two entries may share a natural key; every mutation checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionSet {
    entries: BTreeMap<IntentField, FieldSelection>,
    #[serde(skip)]
    keys: BTreeSet<NaturalKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the selection for `field`, replacing any previous entry.
    pub fn insert(&mut self, selection: FieldSelection) -> TesseraResult<()> {
        let previous: BTreeSet<NaturalKey> = self
            .entries
            .get(&selection.field)
            .map(|p| p.choices.iter().map(|c| c.key().clone()).collect())
            .unwrap_or_default();
        let mut incoming = BTreeSet::new();
        for choice in &selection.choices {
            let taken = self.keys.contains(choice.key()) && !previous.contains(choice.key());
            if taken || !incoming.insert(choice.key().clone()) {
                return Err(TesseraError::DuplicateSelection {
                    key: choice.key().to_string(),
                });
            }
        }
        for key in &previous {
            self.keys.remove(key);
        }
        self.keys.extend(incoming);
        self.entries.insert(selection.field, selection);
        Ok(())
    }

    /// Swap the choice holding `original` in `field`. Returns the replaced
    /// choice, or `None` when `field` holds no such element.
    pub fn replace_choice(
        &mut self,
        field: IntentField,
        original: &NaturalKey,
        replacement: Choice,
    ) -> TesseraResult<Option<Choice>> {
        if self.keys.contains(replacement.key()) {
            return Err(TesseraError::DuplicateSelection {
                key: replacement.key().to_string(),
            });
        }
        let Some(slot) = self
            .entries
            .get_mut(&field)
            .and_then(|entry| entry.choices.iter_mut().find(|c| c.key() == original))
        else {
            return Ok(None);
        };
        self.keys.insert(replacement.key().clone());
        let old = std::mem::replace(slot, replacement);
        self.keys.remove(old.key());
        Ok(Some(old))
    }

    pub fn get(&self, field: IntentField) -> Option<&FieldSelection> {
        self.entries.get(&field)
    }

    pub fn primary(&self, field: IntentField) -> Option<&Element> {
        self.entries.get(&field).and_then(FieldSelection::primary)
    }

    pub fn contains_key(&self, key: &NaturalKey) -> bool {
        self.keys.contains(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = IntentField> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSelection> {
        self.entries.values()
    }

    /// Number of chosen elements across all fields.
    pub fn element_count(&self) -> usize {
        self.keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn freeze(self) -> FrozenSelection {
        FrozenSelection {
            entries: self.entries,
        }
    }
}

/// Read-only selection handed to the composer and returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrozenSelection {
    entries: BTreeMap<IntentField, FieldSelection>,
}

impl FrozenSelection {
    pub fn get(&self, field: IntentField) -> Option<&FieldSelection> {
        self.entries.get(&field)
    }

    pub fn primary(&self, field: IntentField) -> Option<&Element> {
        self.entries.get(&field).and_then(FieldSelection::primary)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSelection> {
        self.entries.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = IntentField> + '_ {
        self.entries.keys().copied()
    }

    /// All chosen natural keys, in field order.
    pub fn keys(&self) -> Vec<&NaturalKey> {
        self.entries
            .values()
            .flat_map(|s| s.choices.iter().map(Choice::key))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
