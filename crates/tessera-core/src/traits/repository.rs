use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::RepositoryError;
use crate::models::Element;

/// Elements without a category filter must have a template longer than this
/// to be eligible for keyword search.
pub const MIN_KEYWORD_SEARCH_TEMPLATE_CHARS: usize = 5;

/// A single repository lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementQuery {
    pub domain: String,
    /// `None` searches every category by keyword.
    pub category: Option<String>,
    /// Normalized phrases and terms to rank by.
    pub keywords: Vec<String>,
    pub limit: usize,
    /// Caller-supplied deadline for this query.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl ElementQuery {
    pub fn new(domain: impl Into<String>, category: Option<String>, limit: usize) -> Self {
        Self {
            domain: domain.into(),
            category,
            keywords: Vec::new(),
            limit,
            timeout: None,
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }
}

/// Read side of the element knowledge base. Safe to share across requests.
pub trait IElementRepository: Send + Sync {
    /// Ranked candidates for `query`, at most `query.limit` of them.
    fn query(&self, query: &ElementQuery) -> Result<Vec<Element>, RepositoryError>;

    /// Version label of the current library snapshot.
    fn library_version(&self) -> Result<String, RepositoryError>;
}

/// Curation write path. Implementations serialize writers and reject
/// duplicate natural keys.
pub trait IElementCurator: Send + Sync {
    /// Insert one element, returning its surrogate id.
    fn insert_element(&self, element: &Element) -> Result<String, RepositoryError>;

    /// Insert all or nothing.
    fn insert_bulk(&self, elements: &[Element]) -> Result<Vec<String>, RepositoryError>;
}

impl<T: IElementRepository + ?Sized> IElementRepository for Arc<T> {
    fn query(&self, query: &ElementQuery) -> Result<Vec<Element>, RepositoryError> {
        (**self).query(query)
    }

    fn library_version(&self) -> Result<String, RepositoryError> {
        (**self).library_version()
    }
}

/// Filter and rank `elements` for `query`. Shared by every store so ranking
/// is identical regardless of backend.
///
/// With a category: every element of `(domain, category)`, ranked by number
/// of matching keywords, then quality, then natural key. Without: only
/// elements matching at least one keyword and carrying a usable template.
pub fn rank_elements<I>(query: &ElementQuery, elements: I) -> Vec<Element>
where
    I: IntoIterator<Item = Element>,
{
    let mut ranked: Vec<(usize, Element)> = elements
        .into_iter()
        .filter(|e| e.key.domain == query.domain)
        .filter(|e| match &query.category {
            Some(category) => &e.key.category == category,
            None => true,
        })
        .map(|e| {
            let hits = query
                .keywords
                .iter()
                .filter(|k| e.matches_keyword(k))
                .count();
            (hits, e)
        })
        .filter(|(hits, e)| {
            query.category.is_some()
                || (*hits > 0
                    && e.template.trim().chars().count() > MIN_KEYWORD_SEARCH_TEMPLATE_CHARS)
        })
        .collect();

    ranked.sort_by(|(ha, a), (hb, b)| {
        hb.cmp(ha)
            .then_with(|| b.quality.total_cmp(&a.quality))
            .then_with(|| a.key.cmp(&b.key))
    });
    ranked.truncate(query.limit);
    ranked.into_iter().map(|(_, e)| e).collect()
}
