//! library_metadata key/value access.

use rusqlite::{params, Connection, OptionalExtension};
use tessera_core::errors::StorageError;

use crate::to_storage_err;

const LIBRARY_VERSION_KEY: &str = "library_version";

pub fn library_version(conn: &Connection) -> Result<String, StorageError> {
    conn.query_row(
        "SELECT value FROM library_metadata WHERE key = ?1",
        params![LIBRARY_VERSION_KEY],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map(|v| v.unwrap_or_else(|| "0".to_string()))
    .map_err(to_storage_err)
}

/// Increment the numeric library version and return the new value.
pub fn bump_library_version(conn: &Connection) -> Result<String, StorageError> {
    let next = library_version(conn)?.parse::<u64>().unwrap_or(0) + 1;
    let next = next.to_string();
    conn.execute(
        "INSERT INTO library_metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![LIBRARY_VERSION_KEY, next],
    )
    .map_err(to_storage_err)?;
    Ok(next)
}
