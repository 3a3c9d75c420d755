//! Processed-document ledger: append-only, queried for duplicate detection.

use rusqlite::{params, Connection, Row};

use engram_core::errors::EngramResult;
use engram_core::models::ProcessedInvoice;

use super::{parse_dt, OptionalRow};
use crate::to_storage_err;

/// Append one ledger entry. Every call creates a distinct row.
pub fn append_processed(conn: &Connection, entry: &ProcessedInvoice) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO processed_invoices (
            invoice_number, vendor_name, invoice_date, gross_total,
            processed_at, fingerprint
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.invoice_number,
            entry.vendor_name,
            entry.invoice_date,
            entry.gross_total,
            entry.processed_at.to_rfc3339(),
            entry.fingerprint,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Ledger entries sharing vendor and document number.
pub fn processed_by_vendor_number(
    conn: &Connection,
    vendor_name: &str,
    invoice_number: &str,
) -> EngramResult<Vec<ProcessedInvoice>> {
    let mut stmt = conn
        .prepare(
            "SELECT invoice_number, vendor_name, invoice_date, gross_total,
                    processed_at, fingerprint
             FROM processed_invoices
             WHERE vendor_name = ?1 AND invoice_number = ?2
             ORDER BY processed_at DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![vendor_name, invoice_number], raw_ledger_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter().map(RawLedgerRow::into_entry).collect()
}

/// The most recent ledger entry with this exact fingerprint, if any.
pub fn processed_by_fingerprint(
    conn: &Connection,
    fingerprint: &str,
) -> EngramResult<Option<ProcessedInvoice>> {
    let mut stmt = conn
        .prepare(
            "SELECT invoice_number, vendor_name, invoice_date, gross_total,
                    processed_at, fingerprint
             FROM processed_invoices
             WHERE fingerprint = ?1
             ORDER BY processed_at DESC LIMIT 1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let raw = stmt
        .query_row(params![fingerprint], raw_ledger_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    raw.map(RawLedgerRow::into_entry).transpose()
}

struct RawLedgerRow {
    invoice_number: String,
    vendor_name: String,
    invoice_date: String,
    gross_total: f64,
    processed_at: String,
    fingerprint: String,
}

fn raw_ledger_row(row: &Row<'_>) -> rusqlite::Result<RawLedgerRow> {
    Ok(RawLedgerRow {
        invoice_number: row.get(0)?,
        vendor_name: row.get(1)?,
        invoice_date: row.get(2)?,
        gross_total: row.get(3)?,
        processed_at: row.get(4)?,
        fingerprint: row.get(5)?,
    })
}

impl RawLedgerRow {
    fn into_entry(self) -> EngramResult<ProcessedInvoice> {
        Ok(ProcessedInvoice {
            invoice_number: self.invoice_number,
            vendor_name: self.vendor_name,
            invoice_date: self.invoice_date,
            gross_total: self.gross_total,
            processed_at: parse_dt(&self.processed_at)?,
            fingerprint: self.fingerprint,
        })
    }
}
