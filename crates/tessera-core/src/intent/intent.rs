//! The validated, immutable Intent and its serialized shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FieldRequest, IntentField};
use crate::errors::IntentError;

/// Subject dimension as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubjectSpec {
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    #[serde(alias = "age_range")]
    pub age_bracket: Option<String>,
}

/// Styling dimension as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylingSpec {
    pub clothing: Option<String>,
    pub hairstyle: Option<String>,
    pub makeup: Option<String>,
}

/// Scene dimension as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneSpec {
    pub era: Option<String>,
    pub atmosphere: Option<String>,
}

/// Lighting dimension as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightingSpec {
    pub lighting_type: Option<String>,
}

/// Visual-style dimension as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualStyleSpec {
    pub art_style: Option<String>,
}

/// Serialized shape of an Intent, grouped by dimension.
///
/// A field value is an attribute code, or `"*"` for "any element of this
/// category". Converting into [`Intent`] validates every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntentSpec {
    pub domain: String,
    pub subject: SubjectSpec,
    pub styling: StylingSpec,
    pub scene: SceneSpec,
    pub lighting: LightingSpec,
    pub visual_style: VisualStyleSpec,
    pub keywords: Vec<String>,
}

impl IntentSpec {
    fn slots(&self) -> [(IntentField, Option<&String>); 10] {
        [
            (IntentField::Gender, self.subject.gender.as_ref()),
            (IntentField::Ethnicity, self.subject.ethnicity.as_ref()),
            (IntentField::AgeBracket, self.subject.age_bracket.as_ref()),
            (IntentField::Clothing, self.styling.clothing.as_ref()),
            (IntentField::Hairstyle, self.styling.hairstyle.as_ref()),
            (IntentField::Makeup, self.styling.makeup.as_ref()),
            (IntentField::Era, self.scene.era.as_ref()),
            (IntentField::Atmosphere, self.scene.atmosphere.as_ref()),
            (IntentField::LightingType, self.lighting.lighting_type.as_ref()),
            (IntentField::ArtStyle, self.visual_style.art_style.as_ref()),
        ]
    }

    fn slot_mut(&mut self, field: IntentField) -> Option<&mut Option<String>> {
        match field {
            IntentField::Gender => Some(&mut self.subject.gender),
            IntentField::Ethnicity => Some(&mut self.subject.ethnicity),
            IntentField::AgeBracket => Some(&mut self.subject.age_bracket),
            IntentField::Clothing => Some(&mut self.styling.clothing),
            IntentField::Hairstyle => Some(&mut self.styling.hairstyle),
            IntentField::Makeup => Some(&mut self.styling.makeup),
            IntentField::Era => Some(&mut self.scene.era),
            IntentField::Atmosphere => Some(&mut self.scene.atmosphere),
            IntentField::LightingType => Some(&mut self.lighting.lighting_type),
            IntentField::ArtStyle => Some(&mut self.visual_style.art_style),
            IntentField::Keywords => None,
        }
    }
}

/// A validated composition request. Created once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntentSpec", into = "IntentSpec")]
pub struct Intent {
    domain: String,
    requests: BTreeMap<IntentField, FieldRequest>,
}

impl Intent {
    pub fn builder(domain: impl Into<String>) -> IntentBuilder {
        IntentBuilder {
            spec: IntentSpec {
                domain: domain.into(),
                ..Default::default()
            },
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn request(&self, field: IntentField) -> Option<&FieldRequest> {
        self.requests.get(&field)
    }

    pub fn is_requested(&self, field: IntentField) -> bool {
        self.requests.contains_key(&field)
    }

    /// All requested fields with their requests, in declaration order.
    pub fn requests(&self) -> impl Iterator<Item = (IntentField, &FieldRequest)> {
        self.requests.iter().map(|(f, r)| (*f, r))
    }

    pub fn fields(&self) -> Vec<IntentField> {
        self.requests.keys().copied().collect()
    }

    /// Injected keyword phrases (empty when none).
    pub fn keywords(&self) -> &[String] {
        match self.requests.get(&IntentField::Keywords) {
            Some(FieldRequest::Phrases(phrases)) => phrases,
            _ => &[],
        }
    }

    /// A copy of this intent without `field`. Fails when nothing would remain.
    pub fn without(&self, field: IntentField) -> Result<Intent, IntentError> {
        let mut spec = IntentSpec::from(self.clone());
        match spec.slot_mut(field) {
            Some(slot) => *slot = None,
            None => spec.keywords.clear(),
        }
        Intent::try_from(spec)
    }
}

impl TryFrom<IntentSpec> for Intent {
    type Error = IntentError;

    fn try_from(spec: IntentSpec) -> Result<Self, Self::Error> {
        let domain = spec.domain.trim().to_ascii_lowercase();
        if domain.is_empty() {
            return Err(IntentError::EmptyDomain);
        }
        if !domain
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(IntentError::InvalidDomain {
                domain: spec.domain.clone(),
                reason: "only a-z, 0-9, '_' and '-' are allowed".to_string(),
            });
        }

        let mut requests = BTreeMap::new();
        for (field, raw) in spec.slots() {
            if let Some(raw) = raw {
                requests.insert(field, FieldRequest::parse(field, raw)?);
            }
        }
        if !spec.keywords.is_empty() {
            requests.insert(IntentField::Keywords, FieldRequest::phrases(&spec.keywords)?);
        }
        if requests.is_empty() {
            return Err(IntentError::NothingRequested);
        }

        Ok(Self { domain, requests })
    }
}

impl From<Intent> for IntentSpec {
    fn from(intent: Intent) -> Self {
        let mut spec = IntentSpec {
            domain: intent.domain,
            ..Default::default()
        };
        for (field, request) in intent.requests {
            match request {
                FieldRequest::Phrases(phrases) => spec.keywords = phrases,
                other => {
                    if let Some(slot) = spec.slot_mut(field) {
                        *slot = Some(other.to_raw());
                    }
                }
            }
        }
        spec
    }
}

/// Fluent construction of an [`Intent`]; validation happens in [`IntentBuilder::build`].
#[derive(Debug, Clone)]
pub struct IntentBuilder {
    spec: IntentSpec,
}

impl IntentBuilder {
    /// Request a specific attribute code. Setting [`IntentField::Keywords`]
    /// here appends a phrase instead.
    pub fn field(mut self, field: IntentField, code: impl Into<String>) -> Self {
        let value = code.into();
        match self.spec.slot_mut(field) {
            Some(slot) => *slot = Some(value),
            None => self.spec.keywords.push(value),
        }
        self
    }

    /// Request a field without pinning an attribute code.
    pub fn unspecified(self, field: IntentField) -> Self {
        self.field(field, super::request::UNSPECIFIED_MARKER)
    }

    pub fn keyword(mut self, phrase: impl Into<String>) -> Self {
        self.spec.keywords.push(phrase.into());
        self
    }

    pub fn build(self) -> Result<Intent, IntentError> {
        Intent::try_from(self.spec)
    }
}
