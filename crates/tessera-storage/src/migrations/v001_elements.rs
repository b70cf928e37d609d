//! V001: element library and its metadata.

pub const MIGRATION_SQL: &str = r#"
-- One row per element. The natural key is (domain, category, name);
-- id is a surrogate assigned on insert.
CREATE TABLE IF NOT EXISTS elements (
    id TEXT PRIMARY KEY,
    domain TEXT NOT NULL,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    localized_name TEXT,
    template TEXT NOT NULL DEFAULT '',
    keywords TEXT NOT NULL DEFAULT '[]',
    quality REAL NOT NULL,
    learned_from TEXT,
    confidence REAL,
    created_at TEXT,
    UNIQUE (domain, category, name)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_elements_domain_category
    ON elements(domain, category);
CREATE INDEX IF NOT EXISTS idx_elements_quality
    ON elements(domain, quality DESC);

-- Library-wide key/value metadata. library_version bumps on every
-- successful curation write.
CREATE TABLE IF NOT EXISTS library_metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
) STRICT;

INSERT OR IGNORE INTO library_metadata (key, value) VALUES ('library_version', '0');
"#;
