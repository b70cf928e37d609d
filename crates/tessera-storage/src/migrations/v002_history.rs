//! V002: composition history and element usage statistics.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS compositions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id TEXT NOT NULL UNIQUE,
    text TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    mode TEXT NOT NULL,
    library_version TEXT NOT NULL,
    created_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_compositions_fingerprint
    ON compositions(fingerprint);
CREATE INDEX IF NOT EXISTS idx_compositions_created
    ON compositions(created_at);

-- Which elements filled which field of a composition.
CREATE TABLE IF NOT EXISTS composition_elements (
    composition_id INTEGER NOT NULL REFERENCES compositions(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    field TEXT NOT NULL,
    domain TEXT NOT NULL,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (composition_id, position)
) STRICT;

CREATE TABLE IF NOT EXISTS element_usage_stats (
    domain TEXT NOT NULL,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    usage_count INTEGER NOT NULL DEFAULT 0,
    last_used TEXT,
    PRIMARY KEY (domain, category, name)
) STRICT;
"#;
