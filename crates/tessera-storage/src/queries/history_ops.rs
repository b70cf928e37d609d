//! Composition history and element usage statistics.

use chrono::{SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tessera_core::errors::StorageError;
use tessera_core::intent::IntentField;
use tessera_core::models::{CompositionResult, NaturalKey, VerbosityMode};
use tessera_core::traits::{CompositionRecord, UsageStats};

use super::parse_timestamp;
use crate::{fingerprint, to_storage_err};

/// Insert a composition and bump usage for every element present in its text.
/// Must run inside a write transaction.
pub fn insert_composition(
    conn: &Connection,
    result: &CompositionResult,
) -> Result<i64, StorageError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    conn.prepare_cached(
        "INSERT INTO compositions (request_id, text, fingerprint, mode, library_version, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            result.request_id().to_string(),
            result.text(),
            fingerprint(result.text()),
            result.mode().name(),
            result.library_version(),
            now,
        ])
    })
    .map_err(to_storage_err)?;
    let composition_id = conn.last_insert_rowid();

    let mut link = conn
        .prepare_cached(
            "INSERT INTO composition_elements (composition_id, position, field, domain, category, name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(to_storage_err)?;
    let mut usage = conn
        .prepare_cached(
            "INSERT INTO element_usage_stats (domain, category, name, usage_count, last_used)
             VALUES (?1, ?2, ?3, 1, ?4)
             ON CONFLICT(domain, category, name) DO UPDATE SET
                 usage_count = usage_count + 1,
                 last_used = excluded.last_used",
        )
        .map_err(to_storage_err)?;

    for (position, fragment) in result.fragments().iter().enumerate() {
        let key = &fragment.element;
        link.execute(params![
            composition_id,
            position as i64,
            fragment.field.name(),
            key.domain,
            key.category,
            key.name,
        ])
        .map_err(to_storage_err)?;
        usage
            .execute(params![key.domain, key.category, key.name, now])
            .map_err(to_storage_err)?;
    }

    Ok(composition_id)
}

pub fn usage_stats(conn: &Connection, key: &NaturalKey) -> Result<Option<UsageStats>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT usage_count, last_used FROM element_usage_stats
             WHERE domain = ?1 AND category = ?2 AND name = ?3",
        )
        .map_err(to_storage_err)?;
    stmt.query_row(params![key.domain, key.category, key.name], |row| {
        let count: i64 = row.get(0)?;
        let last_used: Option<String> = row.get(1)?;
        Ok(UsageStats {
            key: key.clone(),
            usage_count: count as u64,
            last_used: last_used.map(|s| parse_timestamp(&s, 1)).transpose()?,
        })
    })
    .optional()
    .map_err(to_storage_err)
}

/// Most recent compositions first.
pub fn recent_compositions(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<CompositionRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, request_id, text, fingerprint, mode, library_version, created_at
             FROM compositions ORDER BY id DESC LIMIT ?1",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            let mode: String = row.get(4)?;
            let mode: VerbosityMode = mode.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
            })?;
            let created_at: String = row.get(6)?;
            Ok(CompositionRecord {
                id: row.get(0)?,
                request_id: row.get(1)?,
                text: row.get(2)?,
                fingerprint: row.get(3)?,
                mode,
                library_version: row.get(5)?,
                created_at: parse_timestamp(&created_at, 6)?,
                elements: Vec::new(),
            })
        })
        .map_err(to_storage_err)?;

    let mut records = Vec::new();
    for row in rows {
        let mut record = row.map_err(to_storage_err)?;
        record.elements = composition_elements(conn, record.id)?;
        records.push(record);
    }
    Ok(records)
}

fn composition_elements(
    conn: &Connection,
    composition_id: i64,
) -> Result<Vec<(IntentField, NaturalKey)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT field, domain, category, name FROM composition_elements
             WHERE composition_id = ?1 ORDER BY position",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![composition_id], |row| {
            let field: String = row.get(0)?;
            let field: IntentField = field.parse().map_err(|e: tessera_core::errors::IntentError| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
            })?;
            Ok((
                field,
                NaturalKey {
                    domain: row.get(1)?,
                    category: row.get(2)?,
                    name: row.get(3)?,
                },
            ))
        })
        .map_err(to_storage_err)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(to_storage_err)?);
    }
    Ok(out)
}
