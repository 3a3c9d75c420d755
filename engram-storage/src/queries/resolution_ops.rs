//! Resolution-memory rows: append-only, read most-recent-first.

use rusqlite::{params, Connection, Row};

use engram_core::errors::{EngramError, EngramResult, StorageError};
use engram_core::memory::ResolutionMemory;

use super::parse_dt;
use crate::to_storage_err;

/// Append one resolution record. Rows are never updated afterwards.
pub fn append_resolution(conn: &Connection, memory: &ResolutionMemory) -> EngramResult<()> {
    let resolution = serde_json::to_string(&memory.resolution)?;

    conn.execute(
        "INSERT INTO resolution_memories (
            id, invoice_id, vendor_name, discrepancy_type, original_value,
            corrected_value, resolution, human_feedback, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            memory.id,
            memory.invoice_id,
            memory.vendor_name,
            memory.discrepancy_type,
            memory.original_value,
            memory.corrected_value,
            resolution.trim_matches('"'),
            memory.human_feedback,
            memory.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// All resolution records for a vendor, most recent first.
pub fn resolutions_for_vendor(
    conn: &Connection,
    vendor_name: &str,
) -> EngramResult<Vec<ResolutionMemory>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, invoice_id, vendor_name, discrepancy_type, original_value,
                    corrected_value, resolution, human_feedback, created_at
             FROM resolution_memories
             WHERE vendor_name = ?1 ORDER BY created_at DESC, id DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![vendor_name], raw_resolution_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter().map(RawResolutionRow::into_memory).collect()
}

struct RawResolutionRow {
    id: String,
    invoice_id: String,
    vendor_name: String,
    discrepancy_type: String,
    original_value: Option<String>,
    corrected_value: String,
    resolution: String,
    human_feedback: String,
    created_at: String,
}

fn raw_resolution_row(row: &Row<'_>) -> rusqlite::Result<RawResolutionRow> {
    Ok(RawResolutionRow {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        vendor_name: row.get(2)?,
        discrepancy_type: row.get(3)?,
        original_value: row.get(4)?,
        corrected_value: row.get(5)?,
        resolution: row.get(6)?,
        human_feedback: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl RawResolutionRow {
    fn into_memory(self) -> EngramResult<ResolutionMemory> {
        let resolution = serde_json::from_str(&format!("\"{}\"", self.resolution)).map_err(|e| {
            EngramError::Storage(StorageError::MalformedRecord {
                table: "resolution_memories".to_string(),
                id: self.id.clone(),
                reason: format!("parse resolution '{}': {e}", self.resolution),
            })
        })?;

        Ok(ResolutionMemory {
            id: self.id.clone(),
            invoice_id: self.invoice_id,
            vendor_name: self.vendor_name,
            discrepancy_type: self.discrepancy_type,
            original_value: self.original_value,
            corrected_value: self.corrected_value,
            resolution,
            human_feedback: self.human_feedback,
            created_at: parse_dt(&self.created_at)?,
        })
    }
}
