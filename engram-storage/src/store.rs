//! SqliteStore: owns the single write connection, applies pragmas and
//! migrations at open, implements IKnowledgeStore.
//!
//! The engine processes one document at a time; a mutex around the one
//! connection gives callers scoped acquisition without a pool. Every
//! mutation commits before the call returns, so there is no unflushed
//! state to lose at shutdown.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::memory::{CorrectionMemory, ResolutionMemory, VendorMemory};
use engram_core::models::{AuditEntry, ProcessedInvoice, StoreStats};
use engram_core::traits::IKnowledgeStore;

use crate::queries;
use crate::to_storage_err;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> EngramResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> EngramResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> EngramResult<Self> {
        crate::pragmas::apply_pragmas(&conn)?;
        crate::migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure against the connection under the lock.
    fn with_conn<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| to_storage_err("connection mutex poisoned"))?;
        f(&conn)
    }
}

impl IKnowledgeStore for SqliteStore {
    fn get_vendor(&self, vendor_name: &str) -> EngramResult<Option<VendorMemory>> {
        self.with_conn(|conn| queries::vendor_ops::get_vendor(conn, vendor_name))
    }

    fn put_vendor(&self, memory: &VendorMemory) -> EngramResult<()> {
        self.with_conn(|conn| queries::vendor_ops::put_vendor(conn, memory))
    }

    fn list_vendors(&self) -> EngramResult<Vec<VendorMemory>> {
        self.with_conn(queries::vendor_ops::list_vendors)
    }

    fn get_correction(&self, id: &str) -> EngramResult<Option<CorrectionMemory>> {
        self.with_conn(|conn| queries::correction_ops::get_correction(conn, id))
    }

    fn insert_correction(&self, memory: &CorrectionMemory) -> EngramResult<()> {
        self.with_conn(|conn| queries::correction_ops::insert_correction(conn, memory))
    }

    fn update_correction(&self, memory: &CorrectionMemory) -> EngramResult<()> {
        self.with_conn(|conn| queries::correction_ops::update_correction(conn, memory))
    }

    fn corrections_for_vendor(&self, vendor_name: &str) -> EngramResult<Vec<CorrectionMemory>> {
        self.with_conn(|conn| queries::correction_ops::corrections_for_vendor(conn, vendor_name))
    }

    fn append_resolution(&self, memory: &ResolutionMemory) -> EngramResult<()> {
        self.with_conn(|conn| queries::resolution_ops::append_resolution(conn, memory))
    }

    fn resolutions_for_vendor(&self, vendor_name: &str) -> EngramResult<Vec<ResolutionMemory>> {
        self.with_conn(|conn| queries::resolution_ops::resolutions_for_vendor(conn, vendor_name))
    }

    fn append_processed(&self, entry: &ProcessedInvoice) -> EngramResult<()> {
        self.with_conn(|conn| queries::ledger_ops::append_processed(conn, entry))
    }

    fn processed_by_vendor_number(
        &self,
        vendor_name: &str,
        invoice_number: &str,
    ) -> EngramResult<Vec<ProcessedInvoice>> {
        self.with_conn(|conn| {
            queries::ledger_ops::processed_by_vendor_number(conn, vendor_name, invoice_number)
        })
    }

    fn processed_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> EngramResult<Option<ProcessedInvoice>> {
        self.with_conn(|conn| queries::ledger_ops::processed_by_fingerprint(conn, fingerprint))
    }

    fn append_audit(&self, entry: &AuditEntry) -> EngramResult<()> {
        self.with_conn(|conn| queries::audit_ops::append_audit(conn, entry))
    }

    fn audit_for_invoice(&self, invoice_id: &str) -> EngramResult<Vec<AuditEntry>> {
        self.with_conn(|conn| queries::audit_ops::audit_for_invoice(conn, invoice_id))
    }

    fn stats(&self) -> EngramResult<StoreStats> {
        self.with_conn(queries::maintenance::stats)
    }

    fn reset(&self) -> EngramResult<()> {
        self.with_conn(queries::maintenance::reset)
    }
}
