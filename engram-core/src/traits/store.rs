use crate::errors::EngramResult;
use crate::memory::{CorrectionMemory, ResolutionMemory, VendorMemory};
use crate::models::{AuditEntry, ProcessedInvoice, StoreStats};

/// The knowledge-store boundary: four logical tables plus the audit log.
///
/// Structured sub-fields (field mappings, SKU mappings, tax behavior) travel
/// inside the vendor record as serialized blobs; the trait deals only in the
/// owning aggregates. Storage faults are fatal for the current operation and
/// propagate; absence is `None` or an empty list.
pub trait IKnowledgeStore: Send + Sync {
    // --- Vendor memories (unique by vendor name) ---
    fn get_vendor(&self, vendor_name: &str) -> EngramResult<Option<VendorMemory>>;
    fn put_vendor(&self, memory: &VendorMemory) -> EngramResult<()>;
    fn list_vendors(&self) -> EngramResult<Vec<VendorMemory>>;

    // --- Correction memories (many per vendor) ---
    fn get_correction(&self, id: &str) -> EngramResult<Option<CorrectionMemory>>;
    fn insert_correction(&self, memory: &CorrectionMemory) -> EngramResult<()>;
    fn update_correction(&self, memory: &CorrectionMemory) -> EngramResult<()>;
    fn corrections_for_vendor(&self, vendor_name: &str) -> EngramResult<Vec<CorrectionMemory>>;

    // --- Resolution memories (append-only) ---
    fn append_resolution(&self, memory: &ResolutionMemory) -> EngramResult<()>;
    fn resolutions_for_vendor(&self, vendor_name: &str) -> EngramResult<Vec<ResolutionMemory>>;

    // --- Processed-document ledger ---
    fn append_processed(&self, entry: &ProcessedInvoice) -> EngramResult<()>;
    fn processed_by_vendor_number(
        &self,
        vendor_name: &str,
        invoice_number: &str,
    ) -> EngramResult<Vec<ProcessedInvoice>>;
    fn processed_by_fingerprint(&self, fingerprint: &str)
        -> EngramResult<Option<ProcessedInvoice>>;

    // --- Audit log ---
    fn append_audit(&self, entry: &AuditEntry) -> EngramResult<()>;
    fn audit_for_invoice(&self, invoice_id: &str) -> EngramResult<Vec<AuditEntry>>;

    // --- Maintenance ---
    fn stats(&self) -> EngramResult<StoreStats>;
    /// Full reset: the only path that deletes vendor memories.
    fn reset(&self) -> EngramResult<()>;
}
