//! Element insert and lookup. Inserts must run on the writer connection.

use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension};
use tessera_core::errors::{RepositoryError, StorageError};
use tessera_core::models::{Element, NaturalKey};

use super::{row_to_element, ELEMENT_COLUMNS};
use crate::{surrogate_id, to_storage_err};

/// Insert one element, rejecting a duplicate natural key. Returns the id.
pub fn insert_element(conn: &Connection, element: &Element) -> Result<String, RepositoryError> {
    element.validate()?;

    if exists(conn, &element.key)? {
        return Err(RepositoryError::DuplicateKey {
            key: element.key.to_string(),
        });
    }

    let id = match &element.id {
        Some(id) => {
            if id_taken(conn, id)? {
                return Err(RepositoryError::InvalidElement {
                    key: element.key.to_string(),
                    reason: format!("id {id} already in use"),
                });
            }
            id.clone()
        }
        None => next_surrogate_id(conn, &element.key)?,
    };

    let keywords = serde_json::to_string(&element.keywords).map_err(to_storage_err)?;
    let created_at = element
        .provenance
        .created_at
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true));

    conn.prepare_cached(
        "INSERT INTO elements (id, domain, category, name, localized_name, template,
                               keywords, quality, learned_from, confidence, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            id,
            element.key.domain,
            element.key.category,
            element.key.name,
            element.localized_name,
            element.template,
            keywords,
            element.quality,
            element.provenance.learned_from,
            element.provenance.confidence,
            created_at,
        ])
    })
    .map_err(to_storage_err)?;

    Ok(id)
}

/// Look up an element by natural key.
pub fn get_element(conn: &Connection, key: &NaturalKey) -> Result<Option<Element>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements
             WHERE domain = ?1 AND category = ?2 AND name = ?3"
        ))
        .map_err(to_storage_err)?;
    stmt.query_row(params![key.domain, key.category, key.name], row_to_element)
        .optional()
        .map_err(to_storage_err)
}

/// Total number of elements in the library.
pub fn count_elements(conn: &Connection) -> Result<usize, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM elements", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(to_storage_err)
}

fn exists(conn: &Connection, key: &NaturalKey) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT 1 FROM elements WHERE domain = ?1 AND category = ?2 AND name = ?3",
        )
        .map_err(to_storage_err)?;
    stmt.exists(params![key.domain, key.category, key.name])
        .map_err(to_storage_err)
}

fn id_taken(conn: &Connection, id: &str) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT 1 FROM elements WHERE id = ?1")
        .map_err(to_storage_err)?;
    stmt.exists(params![id]).map_err(to_storage_err)
}

fn next_surrogate_id(conn: &Connection, key: &NaturalKey) -> Result<String, StorageError> {
    let count: i64 = conn
        .prepare_cached("SELECT COUNT(*) FROM elements WHERE domain = ?1 AND category = ?2")
        .and_then(|mut stmt| {
            stmt.query_row(params![key.domain, key.category], |row| row.get(0))
        })
        .map_err(to_storage_err)?;

    let mut seq = count as u64 + 1;
    loop {
        let id = surrogate_id(&key.domain, &key.category, seq);
        if !id_taken(conn, &id)? {
            return Ok(id);
        }
        seq += 1;
    }
}
