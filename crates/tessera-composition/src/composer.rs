//! Composer: frozen selection in, ordered and budgeted text out.

use std::collections::BTreeSet;

use tessera_core::config::{CompositionConfig, TesseraConfig};
use tessera_core::intent::{DominanceOrder, IntentField};
use tessera_core::models::{
    CompositionParts, CompositionResult, Fragment, FrozenSelection, NaturalKey, Resolution,
    UnresolvedIssue, VerbosityMode,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::budget::Budget;
use crate::dedup::PhraseLedger;
use crate::render::render;

/// Request metadata carried into the result unchanged.
#[derive(Debug, Clone)]
pub struct ComposeContext {
    pub request_id: Uuid,
    pub library_version: String,
    pub unresolved: Vec<UnresolvedIssue>,
    pub resolutions: Vec<Resolution>,
}

impl ComposeContext {
    pub fn new(request_id: Uuid, library_version: impl Into<String>) -> Self {
        Self {
            request_id,
            library_version: library_version.into(),
            unresolved: Vec::new(),
            resolutions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Composer {
    config: CompositionConfig,
    dominance: DominanceOrder,
}

impl Composer {
    pub fn new(config: CompositionConfig, dominance: DominanceOrder) -> Self {
        Self { config, dominance }
    }

    pub fn from_config(config: &TesseraConfig) -> Self {
        Self::new(config.composition.clone(), config.resolution.dominance.clone())
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn budget(&self) -> Budget {
        Budget {
            max_fragments: self.config.max_fragments,
            max_chars: self.config.max_chars,
        }
    }

    /// Compose `selection` under `mode`.
    ///
    /// Fragments follow the dominance order, so de-duplication only strips
    /// wording from less essential fields and truncation drops the tail.
    /// Output depends only on the inputs.
    pub fn compose(
        &self,
        selection: FrozenSelection,
        mode: VerbosityMode,
        context: ComposeContext,
    ) -> CompositionResult {
        let flagged = flagged_elements(&context.unresolved);
        let mut fields: Vec<IntentField> = selection.fields().collect();
        self.dominance.sort(&mut fields);

        let mut ledger = PhraseLedger::new();
        let mut fragments = Vec::new();
        for field in fields {
            let Some(entry) = selection.get(field) else {
                continue;
            };
            for element in entry.elements() {
                let (raw, rendered_as) = render(element, mode, self.config.detailed_keyword_limit);
                let Some(text) = ledger.admit(&raw) else {
                    debug!(field = %field, element = %element.key, "fragment fully duplicated, removed");
                    continue;
                };
                fragments.push(Fragment {
                    field,
                    element: element.key.clone(),
                    text,
                    rendered_as,
                    flagged: is_flagged(&flagged, field, &element.key),
                });
            }
        }

        let budget = self.budget();
        let truncated = budget.truncate(&mut fragments, &self.config.separator);
        let overrun = budget.is_overrun(&fragments, &self.config.separator);
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.config.separator);

        info!(
            request_id = %context.request_id,
            %mode,
            fragments = fragments.len(),
            truncated = truncated.len(),
            overrun,
            chars = text.chars().count(),
            "composition rendered"
        );

        CompositionResult::new(CompositionParts {
            request_id: context.request_id,
            text,
            selection,
            mode,
            fragments,
            truncated,
            unresolved: context.unresolved,
            resolutions: context.resolutions,
            library_version: context.library_version,
        })
    }
}

/// Subordinate sides of unresolved issues. `None` flags the whole field.
fn flagged_elements(unresolved: &[UnresolvedIssue]) -> BTreeSet<(IntentField, Option<NaturalKey>)> {
    unresolved
        .iter()
        .filter_map(|u| {
            u.issue
                .side(u.subordinate)
                .map(|side| (u.subordinate, side.element.clone()))
        })
        .collect()
}

fn is_flagged(
    flagged: &BTreeSet<(IntentField, Option<NaturalKey>)>,
    field: IntentField,
    key: &NaturalKey,
) -> bool {
    flagged.contains(&(field, None)) || flagged.contains(&(field, Some(key.clone())))
}
