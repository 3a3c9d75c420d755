//! Row mapping and per-table query modules.

pub mod audit_ops;
pub mod correction_ops;
pub mod ledger_ops;
pub mod maintenance;
pub mod resolution_ops;
pub mod vendor_ops;

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_dt(raw: &str) -> EngramResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{raw}': {e}")))
}

/// Helper trait to make `query_row` return `Option` on not-found.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
