//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;
use tessera_core::config::RepositoryConfig;
use tessera_core::errors::StorageError;

use crate::to_storage_err;

/// Apply performance and safety pragmas to the write connection.
pub fn apply_pragmas(conn: &Connection, config: &RepositoryConfig) -> Result<(), StorageError> {
    if config.wal_mode {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| to_storage_err(format!("failed to enable WAL: {e}")))?;
    }
    conn.execute_batch(&format!(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {};
        PRAGMA temp_store = MEMORY;
        ",
        config.busy_timeout_ms
    ))
    .map_err(|e| to_storage_err(format!("failed to apply pragmas: {e}")))
}

/// Apply read-only pragmas to a pooled read connection.
pub fn apply_read_pragmas(conn: &Connection, config: &RepositoryConfig) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {};
        PRAGMA temp_store = MEMORY;
        ",
        config.busy_timeout_ms
    ))
    .map_err(|e| to_storage_err(format!("failed to apply read pragmas: {e}")))
}

/// Verify that WAL mode is active.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(to_storage_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
