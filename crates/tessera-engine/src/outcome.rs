//! What a composition request goes in with and comes out with.

use serde::{Deserialize, Serialize};
use tessera_core::errors::Advisory;
use tessera_core::intent::{Intent, IntentField, IntentSpec};
use tessera_core::models::{CompletenessGap, CompositionResult, VerbosityMode};

/// One request for [`CompositionEngine::compose_many`](crate::CompositionEngine::compose_many).
///
/// Carries the unvalidated intent shape so a malformed entry fails on its own
/// with `InvalidIntent` instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRequest {
    pub intent: IntentSpec,
    /// Falls back to the configured default mode.
    #[serde(default)]
    pub mode: Option<VerbosityMode>,
}

impl CompositionRequest {
    pub fn new(intent: impl Into<IntentSpec>) -> Self {
        Self {
            intent: intent.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: VerbosityMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl From<Intent> for CompositionRequest {
    fn from(intent: Intent) -> Self {
        Self::new(intent)
    }
}

/// A finished request: the composition plus everything advisory about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionOutcome {
    pub result: CompositionResult,
    /// Requirements of the intent the text does not show.
    pub gaps: Vec<CompletenessGap>,
    /// Degraded fields and unresolved conflicts, in pipeline order.
    pub advisories: Vec<Advisory>,
}

impl CompositionOutcome {
    pub fn text(&self) -> &str {
        self.result.text()
    }

    /// No gaps and no advisories.
    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty() && self.advisories.is_empty()
    }

    pub fn advisories_for(&self, field: IntentField) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(move |a| a.field() == field)
    }

    pub fn gap_for(&self, field: IntentField) -> Option<&CompletenessGap> {
        self.gaps.iter().find(|g| g.field == field)
    }
}
