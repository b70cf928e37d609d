use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RepositoryError;
use crate::text;

/// Maximum intrinsic quality score.
pub const MAX_QUALITY: f64 = 10.0;

/// Templates shorter than this fall back to the element's name when rendered.
pub const MIN_TEMPLATE_CHARS: usize = 3;

/// The `(domain, category, name)` triple that uniquely identifies an element.
///
/// Ordering is lexicographic over the triple, which makes it the final,
/// deterministic tie-breaker during selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    pub domain: String,
    pub category: String,
    pub name: String,
}

impl NaturalKey {
    pub fn new(
        domain: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain, self.category, self.name)
    }
}

/// Where an element came from. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    /// Source the curation subsystem learned the element from.
    pub learned_from: Option<String>,
    /// Curator confidence in the extraction (0.0 - 1.0).
    pub confidence: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A reusable knowledge-base record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Storage surrogate id. Carries no semantics.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub key: NaturalKey,
    /// Human-readable name in the curator's display language.
    #[serde(default)]
    pub localized_name: Option<String>,
    /// Render-ready text inserted into the composition.
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Intrinsic reusability score, 0 - 10.
    pub quality: f64,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Element {
    pub fn new(key: NaturalKey, template: impl Into<String>, quality: f64) -> Self {
        Self {
            id: None,
            key,
            localized_name: None,
            template: template.into(),
            keywords: Vec::new(),
            quality,
            provenance: Provenance::default(),
        }
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_localized_name(mut self, name: impl Into<String>) -> Self {
        self.localized_name = Some(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn category(&self) -> &str {
        &self.key.category
    }

    /// Quality scaled into `[0, 1]`.
    pub fn normalized_quality(&self) -> f64 {
        (self.quality / MAX_QUALITY).clamp(0.0, 1.0)
    }

    /// Text used in `simple` rendering. Falls back to the localized name and
    /// then the name when the template is too short to stand on its own.
    pub fn render_template(&self) -> &str {
        let template = self.template.trim();
        if template.chars().count() >= MIN_TEMPLATE_CHARS {
            return template;
        }
        match self.localized_name.as_deref().map(str::trim) {
            Some(local) if !local.is_empty() => local,
            _ => &self.key.name,
        }
    }

    /// Normalized keywords, empties dropped, order kept.
    pub fn normalized_keywords(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.keywords.len());
        for kw in &self.keywords {
            let kw = text::normalize(kw);
            if !kw.is_empty() && !out.contains(&kw) {
                out.push(kw);
            }
        }
        out
    }

    /// Lowercased tokens matched against conflict-rule predicates: the element
    /// name plus its keywords.
    pub fn attribute_tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.key.name.to_lowercase()];
        for kw in self.normalized_keywords() {
            if !tokens.contains(&kw) {
                tokens.push(kw);
            }
        }
        tokens
    }

    /// Whether `keyword` appears in this element's keywords or template.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| text::contains_phrase(k, keyword))
            || text::contains_phrase(&self.template, keyword)
    }

    /// Structural validation applied on the curation write path.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        let invalid = |reason: &str| RepositoryError::InvalidElement {
            key: self.key.to_string(),
            reason: reason.to_string(),
        };
        if self.key.domain.trim().is_empty()
            || self.key.category.trim().is_empty()
            || self.key.name.trim().is_empty()
        {
            return Err(invalid("domain, category and name must be non-empty"));
        }
        if !self.quality.is_finite() || !(0.0..=MAX_QUALITY).contains(&self.quality) {
            return Err(invalid("quality must be between 0 and 10"));
        }
        if let Some(confidence) = self.provenance.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(invalid("provenance confidence must be between 0 and 1"));
            }
        }
        Ok(())
    }
}
