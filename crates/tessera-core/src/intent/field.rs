//! Intent field taxonomy: every field belongs to exactly one dimension.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::IntentError;

/// A group of related intent fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Subject,
    Styling,
    Scene,
    Lighting,
    VisualStyle,
    Keywords,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Self::Subject,
        Self::Styling,
        Self::Scene,
        Self::Lighting,
        Self::VisualStyle,
        Self::Keywords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Styling => "styling",
            Self::Scene => "scene",
            Self::Lighting => "lighting",
            Self::VisualStyle => "visual_style",
            Self::Keywords => "keywords",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single requestable intent field.
///
/// The derived `Ord` is declaration order, which is also the tie-breaker when
/// two fields share a dominance tier (earlier declared dominates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentField {
    Gender,
    Ethnicity,
    AgeBracket,
    Clothing,
    Hairstyle,
    Makeup,
    Era,
    Atmosphere,
    #[serde(rename = "lighting")]
    LightingType,
    ArtStyle,
    Keywords,
}

impl IntentField {
    pub const ALL: [IntentField; 11] = [
        Self::Gender,
        Self::Ethnicity,
        Self::AgeBracket,
        Self::Clothing,
        Self::Hairstyle,
        Self::Makeup,
        Self::Era,
        Self::Atmosphere,
        Self::LightingType,
        Self::ArtStyle,
        Self::Keywords,
    ];

    pub fn dimension(self) -> Dimension {
        match self {
            Self::Gender | Self::Ethnicity | Self::AgeBracket => Dimension::Subject,
            Self::Clothing | Self::Hairstyle | Self::Makeup => Dimension::Styling,
            Self::Era | Self::Atmosphere => Dimension::Scene,
            Self::LightingType => Dimension::Lighting,
            Self::ArtStyle => Dimension::VisualStyle,
            Self::Keywords => Dimension::Keywords,
        }
    }

    /// Stable snake_case name, used in rule tables and config.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Ethnicity => "ethnicity",
            Self::AgeBracket => "age_bracket",
            Self::Clothing => "clothing",
            Self::Hairstyle => "hairstyle",
            Self::Makeup => "makeup",
            Self::Era => "era",
            Self::Atmosphere => "atmosphere",
            Self::LightingType => "lighting",
            Self::ArtStyle => "art_style",
            Self::Keywords => "keywords",
        }
    }

    /// Repository category queried for this field when no override is configured.
    /// Keyword injections search across categories.
    pub fn default_category(self) -> Option<&'static str> {
        match self {
            Self::Keywords => None,
            other => Some(other.name()),
        }
    }

    /// Multi-valued fields keep the top-N candidates instead of a single pick.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Self::Keywords)
    }
}

impl fmt::Display for IntentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntentField {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted)
            .ok_or(IntentError::UnknownField {
                name: s.to_string(),
            })
    }
}
