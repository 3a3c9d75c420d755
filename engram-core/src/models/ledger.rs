use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One processed-document ledger entry, written exactly once per document
/// that completed learning. Used exclusively for duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedInvoice {
    pub invoice_number: String,
    pub vendor_name: String,
    /// Vendor-format date string as extracted; parsed leniently when compared.
    pub invoice_date: String,
    pub gross_total: f64,
    pub processed_at: DateTime<Utc>,
    pub fingerprint: String,
}
