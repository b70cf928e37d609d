//! SQL query modules, one per table group.

pub mod element_crud;
pub mod element_query;
pub mod history_ops;
pub mod metadata;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use tessera_core::models::{Element, NaturalKey, Provenance};

/// Column list matching [`row_to_element`].
pub(crate) const ELEMENT_COLUMNS: &str = "id, domain, category, name, localized_name, template,
     keywords, quality, learned_from, confidence, created_at";

pub(crate) fn row_to_element(row: &Row<'_>) -> rusqlite::Result<Element> {
    let keywords_json: String = row.get(6)?;
    let keywords: Vec<String> = serde_json::from_str(&keywords_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
    let created_at: Option<String> = row.get(10)?;
    let created_at = created_at
        .map(|s| parse_timestamp(&s, 10))
        .transpose()?;

    Ok(Element {
        id: row.get(0)?,
        key: NaturalKey {
            domain: row.get(1)?,
            category: row.get(2)?,
            name: row.get(3)?,
        },
        localized_name: row.get(4)?,
        template: row.get(5)?,
        keywords,
        quality: row.get(7)?,
        provenance: Provenance {
            learned_from: row.get(8)?,
            confidence: row.get(9)?,
            created_at,
        },
    })
}

pub(crate) fn parse_timestamp(s: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
