//! ElementStore: owns the DatabaseManager and implements the repository,
//! curation and history traits.

use std::path::Path;
use std::time::Duration;

use tessera_core::config::RepositoryConfig;
use tessera_core::errors::RepositoryError;
use tessera_core::models::{CompositionResult, Element, NaturalKey};
use tessera_core::traits::{
    CompositionRecord, ElementQuery, ICompositionLog, IElementCurator, IElementRepository,
    UsageStats,
};
use tracing::{debug, info, warn};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{element_crud, element_query, history_ops, metadata};

/// SQLite-backed element repository.
pub struct ElementStore {
    db: DatabaseManager,
    default_timeout: Duration,
}

impl ElementStore {
    /// Open (or create) a store backed by a file.
    pub fn open(path: &Path, config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        let db = DatabaseManager::open(path, config)?;
        info!(path = %path.display(), readers = db.read_pool_size(), "element store opened");
        Ok(Self {
            db,
            default_timeout: config.query_timeout(),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        let db = DatabaseManager::open_in_memory(config)?;
        Ok(Self {
            db,
            default_timeout: config.query_timeout(),
        })
    }

    /// Open the store at `config.db_path`, resolved against `root` when relative.
    pub fn from_config(root: &Path, config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        let path = Path::new(&config.db_path);
        if path.is_absolute() {
            Self::open(path, config)
        } else {
            Self::open(&root.join(path), config)
        }
    }

    pub fn get_element(&self, key: &NaturalKey) -> Result<Option<Element>, RepositoryError> {
        self.db
            .with_reader(|conn| element_crud::get_element(conn, key).map_err(Into::into))
    }

    pub fn count_elements(&self) -> Result<usize, RepositoryError> {
        self.db
            .with_reader(|conn| element_crud::count_elements(conn).map_err(Into::into))
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }
}

impl IElementRepository for ElementStore {
    fn query(&self, query: &ElementQuery) -> Result<Vec<Element>, RepositoryError> {
        let mut query = query.clone();
        if query.timeout.is_none() {
            query.timeout = Some(self.default_timeout);
        }
        let result = self
            .db
            .with_reader(|conn| element_query::query_elements(conn, &query));
        if let Err(RepositoryError::Timeout { elapsed_ms }) = &result {
            warn!(
                domain = %query.domain,
                category = query.category.as_deref().unwrap_or("*"),
                elapsed_ms,
                "element query timed out"
            );
        }
        result
    }

    fn library_version(&self) -> Result<String, RepositoryError> {
        self.db
            .with_reader(|conn| metadata::library_version(conn).map_err(Into::into))
    }
}

impl IElementCurator for ElementStore {
    fn insert_element(&self, element: &Element) -> Result<String, RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let id = element_crud::insert_element(tx, element)?;
                let version = metadata::bump_library_version(tx)?;
                debug!(%id, key = %element.key, %version, "element inserted");
                Ok(id)
            })
        })
    }

    fn insert_bulk(&self, elements: &[Element]) -> Result<Vec<String>, RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let mut ids = Vec::with_capacity(elements.len());
                for element in elements {
                    ids.push(element_crud::insert_element(tx, element)?);
                }
                if !ids.is_empty() {
                    let version = metadata::bump_library_version(tx)?;
                    info!(count = ids.len(), %version, "bulk insert committed");
                }
                Ok(ids)
            })
        })
    }
}

impl ICompositionLog for ElementStore {
    fn record_composition(&self, result: &CompositionResult) -> Result<i64, RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                history_ops::insert_composition(tx, result).map_err(Into::into)
            })
        })
    }

    fn usage_stats(&self, key: &NaturalKey) -> Result<Option<UsageStats>, RepositoryError> {
        self.db
            .with_reader(|conn| history_ops::usage_stats(conn, key).map_err(Into::into))
    }

    fn recent_compositions(&self, limit: usize) -> Result<Vec<CompositionRecord>, RepositoryError> {
        self.db
            .with_reader(|conn| history_ops::recent_compositions(conn, limit).map_err(Into::into))
    }
}
