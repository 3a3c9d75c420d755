//! Aggregate statistics and the full-reset path.

use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::models::StoreStats;

use crate::to_storage_err;

/// Row counts per table plus the average vendor aggregate confidence.
pub fn stats(conn: &Connection) -> EngramResult<StoreStats> {
    let count = |table: &str| -> EngramResult<usize> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as usize)
        .map_err(|e| to_storage_err(e.to_string()))
    };

    let average_vendor_confidence: f64 = conn
        .query_row("SELECT AVG(confidence) FROM vendor_memories", [], |row| {
            row.get::<_, Option<f64>>(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?
        .unwrap_or(0.0);

    Ok(StoreStats {
        vendor_memories: count("vendor_memories")?,
        correction_memories: count("correction_memories")?,
        resolution_memories: count("resolution_memories")?,
        processed_invoices: count("processed_invoices")?,
        average_vendor_confidence,
    })
}

/// Full reset: wipe every table. The only path that deletes vendor memories.
pub fn reset(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        DELETE FROM vendor_memories;
        DELETE FROM correction_memories;
        DELETE FROM resolution_memories;
        DELETE FROM processed_invoices;
        DELETE FROM audit_log;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    tracing::info!("knowledge store reset: all memories and ledger entries deleted");
    Ok(())
}
