//! Explicit repository handle threaded through every pipeline stage.
//!
//! The handle carries the repository and its per-query timeout. Each request
//! opens a [`RequestScope`], which records every natural key the repository
//! returned so a selection can prove its elements came from the same request.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::errors::{RepositoryError, TesseraError, TesseraResult};
use crate::models::{Element, NaturalKey};
use crate::traits::{ElementQuery, IElementRepository};

/// Shared, cloneable access to an element repository.
#[derive(Clone)]
pub struct RepositoryHandle {
    repository: Arc<dyn IElementRepository>,
    query_timeout: Duration,
}

impl RepositoryHandle {
    pub fn new(repository: Arc<dyn IElementRepository>, query_timeout: Duration) -> Self {
        Self {
            repository,
            query_timeout,
        }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn repository(&self) -> &Arc<dyn IElementRepository> {
        &self.repository
    }

    /// Open a scope for one request. Fails when the library version cannot be
    /// read, which is treated as the repository being unreachable.
    pub fn begin_request(&self) -> TesseraResult<RequestScope<'_>> {
        let library_version =
            self.repository
                .library_version()
                .map_err(|e| TesseraError::RepositoryUnavailable {
                    reason: e.to_string(),
                })?;
        Ok(RequestScope {
            handle: self,
            request_id: Uuid::new_v4(),
            library_version,
            issued: RefCell::new(BTreeSet::new()),
            queries: Cell::new(0),
            timeouts: Cell::new(0),
        })
    }
}

impl std::fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

/// Per-request view of the repository. Not shared across threads.
pub struct RequestScope<'a> {
    handle: &'a RepositoryHandle,
    request_id: Uuid,
    library_version: String,
    issued: RefCell<BTreeSet<NaturalKey>>,
    queries: Cell<usize>,
    timeouts: Cell<usize>,
}

impl<'a> RequestScope<'a> {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    /// Run a query with the handle's timeout unless the query sets its own.
    /// Every returned key is recorded as issued to this request.
    pub fn query(&self, mut query: ElementQuery) -> Result<Vec<Element>, RepositoryError> {
        if query.timeout.is_none() {
            query.timeout = Some(self.handle.query_timeout);
        }
        self.queries.set(self.queries.get() + 1);
        let started = Instant::now();
        let result = self.handle.repository.query(&query);
        match &result {
            Ok(elements) => {
                let mut issued = self.issued.borrow_mut();
                issued.extend(elements.iter().map(|e| e.key.clone()));
                debug!(
                    request_id = %self.request_id,
                    category = query.category.as_deref().unwrap_or("*"),
                    returned = elements.len(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "repository query"
                );
            }
            Err(e) if e.is_timeout() => self.timeouts.set(self.timeouts.get() + 1),
            Err(_) => {}
        }
        result
    }

    /// Whether `key` was returned by a query in this request.
    pub fn was_issued(&self, key: &NaturalKey) -> bool {
        self.issued.borrow().contains(key)
    }

    /// Fail unless every key was returned by a query in this request.
    pub fn verify<'k>(&self, keys: impl IntoIterator<Item = &'k NaturalKey>) -> TesseraResult<()> {
        let issued = self.issued.borrow();
        for key in keys {
            if !issued.contains(key) {
                return Err(TesseraError::ProvenanceViolation {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    pub fn timeout_count(&self) -> usize {
        self.timeouts.get()
    }
}
