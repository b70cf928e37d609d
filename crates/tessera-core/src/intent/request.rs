//! What an Intent asks for, per field.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::IntentField;
use crate::errors::IntentError;
use crate::text;

/// Marker accepted in serialized intents for "requested, any element".
pub const UNSPECIFIED_MARKER: &str = "*";

/// Maximum length of a single injected keyword phrase.
pub const MAX_PHRASE_LEN: usize = 120;

/// An opaque, validated attribute code such as `ancient` or `traditional_chinese`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AttributeCode(String);

impl AttributeCode {
    /// Validate and lowercase a raw code: `[a-z0-9][a-z0-9_-]*`.
    pub fn parse(field: IntentField, raw: &str) -> Result<Self, IntentError> {
        let code = raw.trim().to_ascii_lowercase();
        let invalid = |reason: &str| IntentError::InvalidAttributeCode {
            field: field.name().to_string(),
            code: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = code.chars();
        match chars.next() {
            None => return Err(invalid("empty")),
            Some(c) if !(c.is_ascii_lowercase() || c.is_ascii_digit()) => {
                return Err(invalid("must start with a letter or digit"))
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(invalid("only a-z, 0-9, '_' and '-' are allowed"));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human phrase form: `traditional_chinese` → `traditional chinese`.
    pub fn phrase(&self) -> String {
        self.0.replace(['_', '-'], " ")
    }
}

impl fmt::Display for AttributeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The request carried by one intent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRequest {
    /// A specific attribute code.
    Code(AttributeCode),
    /// The field is wanted but any element of its category will do.
    Unspecified,
    /// Free keyword phrases (only valid for [`IntentField::Keywords`]).
    Phrases(Vec<String>),
}

impl FieldRequest {
    /// Parse a structured field value; `"*"` means [`FieldRequest::Unspecified`].
    pub fn parse(field: IntentField, raw: &str) -> Result<Self, IntentError> {
        if field.is_multi_valued() {
            return Err(IntentError::MismatchedRequest {
                field: field.name().to_string(),
                kind: "single-valued".to_string(),
            });
        }
        if raw.trim() == UNSPECIFIED_MARKER {
            return Ok(Self::Unspecified);
        }
        AttributeCode::parse(field, raw).map(Self::Code)
    }

    /// Validate and normalize injected keyword phrases. Duplicates collapse,
    /// first occurrence wins.
    pub fn phrases<S: AsRef<str>>(raw: &[S]) -> Result<Self, IntentError> {
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for (index, phrase) in raw.iter().enumerate() {
            let normalized = text::normalize(phrase.as_ref());
            if normalized.is_empty() {
                return Err(IntentError::EmptyKeywordPhrase { index });
            }
            let len = normalized.chars().count();
            if len > MAX_PHRASE_LEN {
                return Err(IntentError::KeywordPhraseTooLong {
                    index,
                    len,
                    max: MAX_PHRASE_LEN,
                });
            }
            if !out.contains(&normalized) {
                out.push(normalized);
            }
        }
        Ok(Self::Phrases(out))
    }

    pub fn code(&self) -> Option<&AttributeCode> {
        match self {
            Self::Code(code) => Some(code),
            _ => None,
        }
    }

    /// Lowercased tokens this request contributes to conflict-rule matching.
    pub fn attribute_tokens(&self) -> Vec<String> {
        match self {
            Self::Code(code) => vec![code.as_str().to_string()],
            Self::Unspecified => Vec::new(),
            Self::Phrases(phrases) => phrases.clone(),
        }
    }

    /// Serialized form used by [`super::IntentSpec`].
    pub fn to_raw(&self) -> String {
        match self {
            Self::Code(code) => code.as_str().to_string(),
            Self::Unspecified => UNSPECIFIED_MARKER.to_string(),
            Self::Phrases(phrases) => phrases.join(", "),
        }
    }
}
