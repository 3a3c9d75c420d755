//! Audit log: one row per pipeline step per document.

use rusqlite::{params, Connection, Row};

use engram_core::errors::{EngramError, EngramResult, StorageError};
use engram_core::models::AuditEntry;

use super::parse_dt;
use crate::to_storage_err;

/// Append one audit entry.
pub fn append_audit(conn: &Connection, entry: &AuditEntry) -> EngramResult<()> {
    let step = serde_json::to_string(&entry.step)?;
    let referenced = serde_json::to_string(&entry.referenced_memory_ids)?;

    conn.execute(
        "INSERT INTO audit_log (invoice_id, step, detail, referenced_memory_ids, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.invoice_id,
            step.trim_matches('"'),
            entry.detail,
            referenced,
            entry.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// The ordered audit trail for one document.
pub fn audit_for_invoice(conn: &Connection, invoice_id: &str) -> EngramResult<Vec<AuditEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, invoice_id, step, detail, referenced_memory_ids, created_at
             FROM audit_log WHERE invoice_id = ?1 ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![invoice_id], raw_audit_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter().map(RawAuditRow::into_entry).collect()
}

struct RawAuditRow {
    row_id: i64,
    invoice_id: String,
    step: String,
    detail: String,
    referenced_memory_ids: String,
    created_at: String,
}

fn raw_audit_row(row: &Row<'_>) -> rusqlite::Result<RawAuditRow> {
    Ok(RawAuditRow {
        row_id: row.get(0)?,
        invoice_id: row.get(1)?,
        step: row.get(2)?,
        detail: row.get(3)?,
        referenced_memory_ids: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl RawAuditRow {
    fn into_entry(self) -> EngramResult<AuditEntry> {
        let malformed = |reason: String| {
            EngramError::Storage(StorageError::MalformedRecord {
                table: "audit_log".to_string(),
                id: self.row_id.to_string(),
                reason,
            })
        };

        let step = serde_json::from_str(&format!("\"{}\"", self.step))
            .map_err(|e| malformed(format!("parse step '{}': {e}", self.step)))?;
        let referenced_memory_ids = serde_json::from_str(&self.referenced_memory_ids)
            .map_err(|e| malformed(e.to_string()))?;

        Ok(AuditEntry {
            invoice_id: self.invoice_id.clone(),
            step,
            detail: self.detail.clone(),
            referenced_memory_ids,
            created_at: parse_dt(&self.created_at)?,
        })
    }
}
