//! # tessera-storage
//!
//! Element Repository Client. [`ElementStore`] is the SQLite-backed store
//! (serialized writer, round-robin read pool, `PRAGMA user_version`
//! migrations, per-query timeouts). [`InMemoryRepository`] implements the
//! same traits over a map for tests and embedding.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod store;

pub use memory::InMemoryRepository;
pub use store::ElementStore;

use tessera_core::errors::StorageError;

/// Convert any displayable error into a `StorageError::SqliteError`.
pub fn to_storage_err(msg: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: msg.to_string(),
    }
}

/// BLAKE3 hex digest of a composed text.
pub fn fingerprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Surrogate id for the `seq`-th element of a category: `{domain}_{category}_{NNN}`.
pub fn surrogate_id(domain: &str, category: &str, seq: u64) -> String {
    format!("{domain}_{category}_{seq:03}")
}
