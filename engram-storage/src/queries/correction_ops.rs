//! Correction-memory rows: many per vendor, looked up by vendor ordered by
//! descending confidence.

use rusqlite::{params, Connection, Row};

use engram_core::errors::{EngramError, EngramResult, StorageError};
use engram_core::memory::{Confidence, CorrectionMemory};

use super::{parse_dt, OptionalRow};
use crate::to_storage_err;

const COLUMNS: &str = "id, vendor_name, target, pattern, kind, correction_value,
                       confidence, success_count, failure_count, created_at, updated_at";

/// Insert a new correction memory.
pub fn insert_correction(conn: &Connection, memory: &CorrectionMemory) -> EngramResult<()> {
    let target = serde_json::to_string(&memory.target)?;
    let kind = serde_json::to_string(&memory.kind)?;

    conn.execute(
        "INSERT INTO correction_memories (
            id, vendor_name, target, pattern, kind, correction_value,
            confidence, success_count, failure_count, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            memory.id,
            memory.vendor_name,
            target,
            memory.pattern,
            kind.trim_matches('"'),
            memory.correction_value,
            memory.confidence.value(),
            memory.success_count,
            memory.failure_count,
            memory.created_at.to_rfc3339(),
            memory.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Update the mutable fields of an existing correction memory.
pub fn update_correction(conn: &Connection, memory: &CorrectionMemory) -> EngramResult<()> {
    let rows = conn
        .execute(
            "UPDATE correction_memories SET
                pattern = ?2, correction_value = ?3, confidence = ?4,
                success_count = ?5, failure_count = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                memory.id,
                memory.pattern,
                memory.correction_value,
                memory.confidence.value(),
                memory.success_count,
                memory.failure_count,
                memory.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(EngramError::NotFound {
            id: memory.id.clone(),
        });
    }
    Ok(())
}

/// Get one correction memory by id.
pub fn get_correction(conn: &Connection, id: &str) -> EngramResult<Option<CorrectionMemory>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLUMNS} FROM correction_memories WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let raw = stmt
        .query_row(params![id], raw_correction_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    raw.map(RawCorrectionRow::into_memory).transpose()
}

/// All correction memories for a vendor, highest confidence first.
pub fn corrections_for_vendor(
    conn: &Connection,
    vendor_name: &str,
) -> EngramResult<Vec<CorrectionMemory>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM correction_memories
             WHERE vendor_name = ?1 ORDER BY confidence DESC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![vendor_name], raw_correction_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter().map(RawCorrectionRow::into_memory).collect()
}

struct RawCorrectionRow {
    id: String,
    vendor_name: String,
    target: String,
    pattern: String,
    kind: String,
    correction_value: String,
    confidence: f64,
    success_count: u32,
    failure_count: u32,
    created_at: String,
    updated_at: String,
}

fn raw_correction_row(row: &Row<'_>) -> rusqlite::Result<RawCorrectionRow> {
    Ok(RawCorrectionRow {
        id: row.get(0)?,
        vendor_name: row.get(1)?,
        target: row.get(2)?,
        pattern: row.get(3)?,
        kind: row.get(4)?,
        correction_value: row.get(5)?,
        confidence: row.get(6)?,
        success_count: row.get(7)?,
        failure_count: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl RawCorrectionRow {
    fn into_memory(self) -> EngramResult<CorrectionMemory> {
        let malformed = |reason: String| {
            EngramError::Storage(StorageError::MalformedRecord {
                table: "correction_memories".to_string(),
                id: self.id.clone(),
                reason,
            })
        };

        let target =
            serde_json::from_str(&self.target).map_err(|e| malformed(e.to_string()))?;
        let kind = serde_json::from_str(&format!("\"{}\"", self.kind))
            .map_err(|e| malformed(format!("parse kind '{}': {e}", self.kind)))?;

        Ok(CorrectionMemory {
            id: self.id.clone(),
            vendor_name: self.vendor_name,
            target,
            pattern: self.pattern,
            kind,
            correction_value: self.correction_value,
            confidence: Confidence::new(self.confidence),
            success_count: self.success_count,
            failure_count: self.failure_count,
            created_at: parse_dt(&self.created_at)?,
            updated_at: parse_dt(&self.updated_at)?,
        })
    }
}
