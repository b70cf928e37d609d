// Single source of truth for all default values.

// --- Selection ---
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.6;
pub const DEFAULT_QUALITY_WEIGHT: f64 = 0.4;
pub const DEFAULT_CATEGORY_BONUS: f64 = 0.15;
pub const DEFAULT_KEYWORD_RELEVANCE_FLOOR: f64 = 0.2;
pub const DEFAULT_KEYWORD_TOP_N: usize = 3;
pub const DEFAULT_CANDIDATE_LIMIT: usize = 12;

// --- Composition ---
pub const DEFAULT_DETAILED_KEYWORD_LIMIT: usize = 3;
pub const DEFAULT_MAX_FRAGMENTS: usize = 24;
pub const DEFAULT_MAX_CHARS: usize = 600;
pub const DEFAULT_SEPARATOR: &str = ", ";

// --- Resolution ---
pub const DEFAULT_REQUERY_LIMIT: usize = 24;

// --- Repository ---
pub const DEFAULT_DB_FILENAME: &str = "tessera.db";
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_WAL_MODE: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;

// --- Files ---
pub const PROJECT_CONFIG_FILE: &str = "tessera.toml";
