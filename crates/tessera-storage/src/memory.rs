//! In-memory element repository: same ranking and duplicate rules as the
//! SQLite store, no persistence.

use std::collections::BTreeMap;
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use tessera_core::errors::RepositoryError;
use tessera_core::models::{CompositionResult, Element, NaturalKey};
use tessera_core::traits::{
    rank_elements, CompositionRecord, ElementQuery, ICompositionLog, IElementCurator,
    IElementRepository, UsageStats,
};

use crate::{fingerprint, surrogate_id, to_storage_err};

#[derive(Default)]
struct Library {
    elements: BTreeMap<NaturalKey, Element>,
    version: u64,
}

#[derive(Default)]
struct History {
    records: Vec<CompositionRecord>,
    usage: BTreeMap<NaturalKey, UsageStats>,
}

/// Map-backed repository. Writers serialize on one lock; readers share.
#[derive(Default)]
pub struct InMemoryRepository {
    library: RwLock<Library>,
    history: Mutex<History>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a batch of elements, all or nothing.
    pub fn with_elements(elements: &[Element]) -> Result<Self, RepositoryError> {
        let repo = Self::new();
        repo.insert_bulk(elements)?;
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.library.read().map(|l| l.elements.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn assign_id(library: &Library, element: &Element) -> Result<String, RepositoryError> {
        let taken = |id: &str| {
            library
                .elements
                .values()
                .any(|e| e.id.as_deref() == Some(id))
        };
        if let Some(id) = &element.id {
            if taken(id) {
                return Err(RepositoryError::InvalidElement {
                    key: element.key.to_string(),
                    reason: format!("id {id} already in use"),
                });
            }
            return Ok(id.clone());
        }
        let in_category = library
            .elements
            .keys()
            .filter(|k| k.domain == element.key.domain && k.category == element.key.category)
            .count() as u64;
        let mut seq = in_category + 1;
        loop {
            let id = surrogate_id(&element.key.domain, &element.key.category, seq);
            if !taken(&id) {
                return Ok(id);
            }
            seq += 1;
        }
    }
}

impl IElementRepository for InMemoryRepository {
    fn query(&self, query: &ElementQuery) -> Result<Vec<Element>, RepositoryError> {
        let library = self
            .library
            .read()
            .map_err(|e| RepositoryError::Unavailable {
                reason: format!("library lock poisoned: {e}"),
            })?;
        Ok(rank_elements(query, library.elements.values().cloned()))
    }

    fn library_version(&self) -> Result<String, RepositoryError> {
        let library = self
            .library
            .read()
            .map_err(|e| RepositoryError::Unavailable {
                reason: format!("library lock poisoned: {e}"),
            })?;
        Ok(library.version.to_string())
    }
}

impl IElementCurator for InMemoryRepository {
    fn insert_element(&self, element: &Element) -> Result<String, RepositoryError> {
        self.insert_bulk(std::slice::from_ref(element))
            .map(|mut ids| ids.remove(0))
    }

    fn insert_bulk(&self, elements: &[Element]) -> Result<Vec<String>, RepositoryError> {
        let mut library = self
            .library
            .write()
            .map_err(|e| to_storage_err(format!("library lock poisoned: {e}")))?;

        // Stage into a copy so a failure part-way leaves the library untouched.
        let mut staged = Library {
            elements: library.elements.clone(),
            version: library.version,
        };
        let mut ids = Vec::with_capacity(elements.len());
        for element in elements {
            element.validate()?;
            if staged.elements.contains_key(&element.key) {
                return Err(RepositoryError::DuplicateKey {
                    key: element.key.to_string(),
                });
            }
            let id = Self::assign_id(&staged, element)?;
            let mut stored = element.clone();
            stored.id = Some(id.clone());
            staged.elements.insert(stored.key.clone(), stored);
            ids.push(id);
        }
        if !ids.is_empty() {
            staged.version += 1;
        }
        *library = staged;
        Ok(ids)
    }
}

impl ICompositionLog for InMemoryRepository {
    fn record_composition(&self, result: &CompositionResult) -> Result<i64, RepositoryError> {
        let mut history = self
            .history
            .lock()
            .map_err(|e| to_storage_err(format!("history lock poisoned: {e}")))?;
        let request_id = result.request_id().to_string();
        if history.records.iter().any(|r| r.request_id == request_id) {
            return Err(to_storage_err(format!("composition {request_id} already recorded")).into());
        }

        let now = Utc::now();
        let id = history.records.len() as i64 + 1;
        let elements: Vec<_> = result
            .fragments()
            .iter()
            .map(|f| (f.field, f.element.clone()))
            .collect();
        for (_, key) in &elements {
            let stats = history.usage.entry(key.clone()).or_insert_with(|| UsageStats {
                key: key.clone(),
                usage_count: 0,
                last_used: None,
            });
            stats.usage_count += 1;
            stats.last_used = Some(now);
        }
        history.records.push(CompositionRecord {
            id,
            request_id,
            text: result.text().to_string(),
            fingerprint: fingerprint(result.text()),
            mode: result.mode(),
            library_version: result.library_version().to_string(),
            created_at: now,
            elements,
        });
        Ok(id)
    }

    fn usage_stats(&self, key: &NaturalKey) -> Result<Option<UsageStats>, RepositoryError> {
        let history = self
            .history
            .lock()
            .map_err(|e| to_storage_err(format!("history lock poisoned: {e}")))?;
        Ok(history.usage.get(key).cloned())
    }

    fn recent_compositions(&self, limit: usize) -> Result<Vec<CompositionRecord>, RepositoryError> {
        let history = self
            .history
            .lock()
            .map_err(|e| to_storage_err(format!("history lock poisoned: {e}")))?;
        Ok(history.records.iter().rev().take(limit).cloned().collect())
    }
}
