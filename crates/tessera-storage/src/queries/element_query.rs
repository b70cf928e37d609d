//! Ranked candidate lookup with a per-query deadline.

use std::time::Instant;

use rusqlite::{params, Connection, ErrorCode};
use tessera_core::errors::RepositoryError;
use tessera_core::models::Element;
use tessera_core::traits::{rank_elements, ElementQuery, MIN_KEYWORD_SEARCH_TEMPLATE_CHARS};

use super::{row_to_element, ELEMENT_COLUMNS};
use crate::to_storage_err;

/// SQLite VM instructions between deadline checks.
const PROGRESS_OPS: i32 = 1_000;

/// Fetch and rank candidates for `query`. A query running past
/// `query.timeout` is interrupted and reported as [`RepositoryError::Timeout`].
pub fn query_elements(
    conn: &Connection,
    query: &ElementQuery,
) -> Result<Vec<Element>, RepositoryError> {
    let started = Instant::now();
    if let Some(timeout) = query.timeout {
        let deadline = started + timeout;
        conn.progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= deadline));
    }

    let fetched = fetch(conn, query);

    if query.timeout.is_some() {
        conn.progress_handler(0, None::<fn() -> bool>);
    }

    match fetched {
        Ok(rows) => Ok(rank_elements(query, rows)),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::OperationInterrupted =>
        {
            Err(RepositoryError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            })
        }
        Err(e) => Err(RepositoryError::Storage(to_storage_err(e))),
    }
}

fn fetch(conn: &Connection, query: &ElementQuery) -> rusqlite::Result<Vec<Element>> {
    match &query.category {
        Some(category) => {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {ELEMENT_COLUMNS} FROM elements WHERE domain = ?1 AND category = ?2"
            ))?;
            let rows = stmt.query_map(params![query.domain, category], row_to_element)?;
            rows.collect()
        }
        None => {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {ELEMENT_COLUMNS} FROM elements
                 WHERE domain = ?1 AND length(trim(template)) > ?2"
            ))?;
            let rows = stmt.query_map(
                params![query.domain, MIN_KEYWORD_SEARCH_TEMPLATE_CHARS as i64],
                row_to_element,
            )?;
            rows.collect()
        }
    }
}
