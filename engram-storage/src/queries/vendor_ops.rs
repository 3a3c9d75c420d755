//! Vendor-memory rows: one per vendor, sub-memories as JSON blobs.

use rusqlite::{params, Connection, Row};

use engram_core::errors::{EngramError, EngramResult, StorageError};
use engram_core::memory::{Confidence, VendorMemory};

use super::{parse_dt, OptionalRow};
use crate::to_storage_err;

const COLUMNS: &str = "vendor_name, field_mappings, tax_behavior, default_currency,
                       sku_mappings, payment_terms, confidence, usage_count,
                       created_at, updated_at";

/// Insert or replace the vendor row (unique by vendor name).
pub fn put_vendor(conn: &Connection, memory: &VendorMemory) -> EngramResult<()> {
    let field_mappings = serde_json::to_string(&memory.field_mappings)?;
    let sku_mappings = serde_json::to_string(&memory.sku_mappings)?;
    let tax_behavior = memory
        .tax_behavior
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT OR REPLACE INTO vendor_memories (
            vendor_name, field_mappings, tax_behavior, default_currency,
            sku_mappings, payment_terms, confidence, usage_count,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            memory.vendor_name,
            field_mappings,
            tax_behavior,
            memory.default_currency,
            sku_mappings,
            memory.payment_terms,
            memory.confidence.value(),
            memory.usage_count as i64,
            memory.created_at.to_rfc3339(),
            memory.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get one vendor memory by name.
pub fn get_vendor(conn: &Connection, vendor_name: &str) -> EngramResult<Option<VendorMemory>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLUMNS} FROM vendor_memories WHERE vendor_name = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let raw = stmt
        .query_row(params![vendor_name], raw_vendor_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    raw.map(RawVendorRow::into_memory).transpose()
}

/// All vendor memories.
pub fn list_vendors(conn: &Connection) -> EngramResult<Vec<VendorMemory>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLUMNS} FROM vendor_memories ORDER BY vendor_name"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], raw_vendor_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter().map(RawVendorRow::into_memory).collect()
}

/// Raw column values before the JSON blobs are decoded; decoding is kept out
/// of the rusqlite closure so blob corruption surfaces as a typed error.
struct RawVendorRow {
    vendor_name: String,
    field_mappings: String,
    tax_behavior: Option<String>,
    default_currency: Option<String>,
    sku_mappings: String,
    payment_terms: Option<String>,
    confidence: f64,
    usage_count: i64,
    created_at: String,
    updated_at: String,
}

fn raw_vendor_row(row: &Row<'_>) -> rusqlite::Result<RawVendorRow> {
    Ok(RawVendorRow {
        vendor_name: row.get(0)?,
        field_mappings: row.get(1)?,
        tax_behavior: row.get(2)?,
        default_currency: row.get(3)?,
        sku_mappings: row.get(4)?,
        payment_terms: row.get(5)?,
        confidence: row.get(6)?,
        usage_count: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl RawVendorRow {
    fn into_memory(self) -> EngramResult<VendorMemory> {
        let malformed = |reason: String| {
            EngramError::Storage(StorageError::MalformedRecord {
                table: "vendor_memories".to_string(),
                id: self.vendor_name.clone(),
                reason,
            })
        };

        let field_mappings =
            serde_json::from_str(&self.field_mappings).map_err(|e| malformed(e.to_string()))?;
        let sku_mappings =
            serde_json::from_str(&self.sku_mappings).map_err(|e| malformed(e.to_string()))?;
        let tax_behavior = self
            .tax_behavior
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| malformed(e.to_string()))?;

        Ok(VendorMemory {
            vendor_name: self.vendor_name.clone(),
            field_mappings,
            tax_behavior,
            default_currency: self.default_currency,
            sku_mappings,
            payment_terms: self.payment_terms,
            confidence: Confidence::new(self.confidence),
            usage_count: self.usage_count.max(0) as u64,
            created_at: parse_dt(&self.created_at)?,
            updated_at: parse_dt(&self.updated_at)?,
        })
    }
}
