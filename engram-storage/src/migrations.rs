//! Schema migrations tracked via `PRAGMA user_version`.

use rusqlite::Connection;

use engram_core::errors::{EngramError, EngramResult, StorageError};

use crate::to_storage_err;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Run all outstanding migrations on a fresh or existing database.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    if version < 1 {
        v001_memory_tables(conn).map_err(|e| {
            EngramError::Storage(StorageError::MigrationFailed {
                version: 1,
                reason: e.to_string(),
            })
        })?;
        tracing::info!("v001: memory, ledger, and audit tables created");
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// v001: vendor_memories, correction_memories, resolution_memories,
/// processed_invoices, audit_log.
fn v001_memory_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS vendor_memories (
            vendor_name      TEXT PRIMARY KEY,
            field_mappings   TEXT NOT NULL DEFAULT '[]',
            tax_behavior     TEXT,
            default_currency TEXT,
            sku_mappings     TEXT NOT NULL DEFAULT '[]',
            payment_terms    TEXT,
            confidence       REAL NOT NULL,
            usage_count      INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS correction_memories (
            id               TEXT PRIMARY KEY,
            vendor_name      TEXT NOT NULL,
            target           TEXT NOT NULL,
            pattern          TEXT NOT NULL,
            kind             TEXT NOT NULL,
            correction_value TEXT NOT NULL,
            confidence       REAL NOT NULL,
            success_count    INTEGER NOT NULL DEFAULT 0,
            failure_count    INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_corrections_vendor
            ON correction_memories(vendor_name);

        CREATE TABLE IF NOT EXISTS resolution_memories (
            id               TEXT PRIMARY KEY,
            invoice_id       TEXT NOT NULL,
            vendor_name      TEXT NOT NULL,
            discrepancy_type TEXT NOT NULL,
            original_value   TEXT,
            corrected_value  TEXT NOT NULL,
            resolution       TEXT NOT NULL,
            human_feedback   TEXT NOT NULL DEFAULT '',
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_resolutions_vendor
            ON resolution_memories(vendor_name);

        CREATE TABLE IF NOT EXISTS processed_invoices (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_number TEXT NOT NULL,
            vendor_name    TEXT NOT NULL,
            invoice_date   TEXT NOT NULL,
            gross_total    REAL NOT NULL,
            processed_at   TEXT NOT NULL,
            fingerprint    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_processed_vendor_number
            ON processed_invoices(vendor_name, invoice_number);
        CREATE INDEX IF NOT EXISTS idx_processed_fingerprint
            ON processed_invoices(fingerprint);

        CREATE TABLE IF NOT EXISTS audit_log (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_id              TEXT NOT NULL,
            step                    TEXT NOT NULL,
            detail                  TEXT NOT NULL DEFAULT '',
            referenced_memory_ids   TEXT NOT NULL DEFAULT '[]',
            created_at              TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_invoice ON audit_log(invoice_id);
        ",
    )
}
