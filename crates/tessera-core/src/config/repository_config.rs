use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Element repository configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Database file path. Relative paths resolve against the project root.
    pub db_path: String,
    pub query_timeout_ms: u64,
    pub read_pool_size: usize,
    pub busy_timeout_ms: u32,
    pub wal_mode: bool,
}

impl RepositoryConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
            query_timeout_ms: defaults::DEFAULT_QUERY_TIMEOUT_MS,
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            wal_mode: defaults::DEFAULT_WAL_MODE,
        }
    }
}
