//! Composer output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FrozenSelection, NaturalKey, Resolution, UnresolvedIssue};
use crate::intent::IntentField;

/// Caller-selectable rendering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbosityMode {
    /// One template per field.
    Simple,
    /// Up to K keywords per field.
    Detailed,
    /// Per element: detailed when it has more than two keywords.
    #[default]
    Auto,
}

impl VerbosityMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detailed => "detailed",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for VerbosityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VerbosityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "detailed" => Ok(Self::Detailed),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown verbosity mode: {other}")),
        }
    }
}

/// One rendered piece of the composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub field: IntentField,
    pub element: NaturalKey,
    pub text: String,
    /// The concrete mode this fragment was rendered with (never `Auto`).
    pub rendered_as: VerbosityMode,
    /// Set when the fragment belongs to an unresolved conflict.
    pub flagged: bool,
}

/// Everything needed to build a [`CompositionResult`].
#[derive(Debug, Clone)]
pub struct CompositionParts {
    pub request_id: Uuid,
    pub text: String,
    pub selection: FrozenSelection,
    pub mode: VerbosityMode,
    pub fragments: Vec<Fragment>,
    pub truncated: Vec<Fragment>,
    pub unresolved: Vec<UnresolvedIssue>,
    pub resolutions: Vec<Resolution>,
    pub library_version: String,
}

/// Final output of one request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionResult {
    request_id: Uuid,
    text: String,
    selection: FrozenSelection,
    mode: VerbosityMode,
    fragments: Vec<Fragment>,
    truncated: Vec<Fragment>,
    unresolved: Vec<UnresolvedIssue>,
    resolutions: Vec<Resolution>,
    library_version: String,
}

impl CompositionResult {
    pub fn new(parts: CompositionParts) -> Self {
        Self {
            request_id: parts.request_id,
            text: parts.text,
            selection: parts.selection,
            mode: parts.mode,
            fragments: parts.fragments,
            truncated: parts.truncated,
            unresolved: parts.unresolved,
            resolutions: parts.resolutions,
            library_version: parts.library_version,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> &FrozenSelection {
        &self.selection
    }

    /// The mode requested by the caller.
    pub fn mode(&self) -> VerbosityMode {
        self.mode
    }

    /// Fragments present in the text, in text order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Fragments dropped to fit the length budget.
    pub fn truncated(&self) -> &[Fragment] {
        &self.truncated
    }

    pub fn unresolved(&self) -> &[UnresolvedIssue] {
        &self.unresolved
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    pub fn fragments_for(&self, field: IntentField) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(move |f| f.field == field)
    }

    pub fn was_truncated(&self, field: IntentField) -> bool {
        self.truncated.iter().any(|f| f.field == field)
    }
}
