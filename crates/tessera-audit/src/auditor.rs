//! Completeness auditor: re-reads the composed text against the intent.
//!
//! Advisory only. The result is never modified; every unmet requirement
//! becomes a [`CompletenessGap`] carrying the most specific reason available.

use tessera_core::config::TesseraConfig;
use tessera_core::intent::{Intent, KeywordVocabulary};
use tessera_core::models::{CompletenessGap, CompositionResult, GapReason};
use tracing::{debug, info};

use crate::requirement::{requirements, Requirement};

#[derive(Debug, Clone, Default)]
pub struct CompletenessAuditor {
    vocabulary: KeywordVocabulary,
}

impl CompletenessAuditor {
    pub fn new(vocabulary: KeywordVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn from_config(config: &TesseraConfig) -> Self {
        Self::new(config.keyword_vocabulary())
    }

    pub fn requirements(&self, intent: &Intent) -> Vec<Requirement> {
        requirements(intent, &self.vocabulary)
    }

    /// Gaps for every requirement of `intent` not observable in `result`.
    /// An empty list means the text covers the whole intent.
    pub fn audit(&self, intent: &Intent, result: &CompositionResult) -> Vec<CompletenessGap> {
        let gaps: Vec<CompletenessGap> = self
            .requirements(intent)
            .into_iter()
            .filter(|req| !is_satisfied(req, result))
            .map(|req| {
                let reason = gap_reason(&req, result);
                debug!(
                    request_id = %result.request_id(),
                    requirement = %req.label,
                    %reason,
                    "completeness gap"
                );
                CompletenessGap {
                    field: req.field,
                    suggestion: suggestion(&req, result),
                    expected_keywords: req.expected_keywords(),
                    requirement: req.label,
                    reason,
                }
            })
            .collect();

        info!(
            request_id = %result.request_id(),
            gaps = gaps.len(),
            "completeness audit finished"
        );
        gaps
    }
}

/// Unspecified fields only need one surviving fragment; everything else
/// needs expected wording in the final text.
fn is_satisfied(req: &Requirement, result: &CompositionResult) -> bool {
    if req.is_unspecified() {
        return result.fragments_for(req.field).next().is_some();
    }
    req.is_evident_in(result.text())
}

/// Most specific first: nothing to select, cut by the budget, swapped by the
/// resolver, or simply not worded in.
fn gap_reason(req: &Requirement, result: &CompositionResult) -> GapReason {
    let selected = result
        .selection()
        .get(req.field)
        .is_some_and(|s| !s.is_empty());
    if !selected {
        GapReason::NoCandidates
    } else if result.was_truncated(req.field) {
        GapReason::Truncated
    } else if result.resolutions().iter().any(|r| r.field == req.field) {
        GapReason::ReplacedByResolution
    } else {
        GapReason::NotRepresented
    }
}

/// The primary expected phrase, or for an unspecified field the template of
/// whatever was selected, falling back to the field name.
fn suggestion(req: &Requirement, result: &CompositionResult) -> String {
    if let Some(primary) = req.phrases.first() {
        return primary.clone();
    }
    result
        .selection()
        .primary(req.field)
        .map(|e| e.render_template().to_string())
        .unwrap_or_else(|| req.field.name().replace('_', " "))
}
