//! The duplicate guard: near-match detection against the processed ledger.

use chrono::Utc;

use engram_core::config::EngramConfig;
use engram_core::document::Invoice;
use engram_core::errors::EngramResult;
use engram_core::models::ProcessedInvoice;
use engram_core::traits::IKnowledgeStore;
use engram_extract::date;

use crate::fingerprint;

/// Checks incoming documents against the ledger and records accepted ones.
pub struct DuplicateGuard {
    window_days: i64,
    amount_tolerance: f64,
}

impl DuplicateGuard {
    pub fn new(config: &EngramConfig) -> Self {
        Self {
            window_days: config.duplicate_window_days,
            amount_tolerance: config.duplicate_amount_tolerance,
        }
    }

    /// Find a ledger entry this document likely duplicates.
    ///
    /// A match is either an entry with the same vendor and number whose date
    /// is within the window and whose gross total is within tolerance, or an
    /// entry with the exact same fingerprint. Unparsable dates disable only
    /// the proximity check.
    pub fn check(
        &self,
        store: &dyn IKnowledgeStore,
        invoice: &Invoice,
    ) -> EngramResult<Option<ProcessedInvoice>> {
        let candidates =
            store.processed_by_vendor_number(&invoice.vendor_name, &invoice.invoice_number)?;

        for candidate in candidates {
            if self.is_near_match(invoice, &candidate) {
                tracing::warn!(
                    vendor = %invoice.vendor_name,
                    invoice_number = %invoice.invoice_number,
                    "near-duplicate of a processed document"
                );
                return Ok(Some(candidate));
            }
        }

        let print = fingerprint::of_invoice(invoice);
        if let Some(exact) = store.processed_by_fingerprint(&print)? {
            tracing::warn!(
                vendor = %invoice.vendor_name,
                invoice_number = %invoice.invoice_number,
                "exact fingerprint match in the processed ledger"
            );
            return Ok(Some(exact));
        }

        Ok(None)
    }

    /// Append the document to the processed ledger. Every call creates a new
    /// entry; callers record an accepted document exactly once.
    pub fn record(&self, store: &dyn IKnowledgeStore, invoice: &Invoice) -> EngramResult<ProcessedInvoice> {
        let entry = ProcessedInvoice {
            invoice_number: invoice.invoice_number.clone(),
            vendor_name: invoice.vendor_name.clone(),
            invoice_date: invoice.invoice_date.clone(),
            gross_total: invoice.gross_total,
            processed_at: Utc::now(),
            fingerprint: fingerprint::of_invoice(invoice),
        };
        store.append_processed(&entry)?;
        Ok(entry)
    }

    fn is_near_match(&self, invoice: &Invoice, candidate: &ProcessedInvoice) -> bool {
        let Some(day_distance) = date::days_between(&invoice.invoice_date, &candidate.invoice_date)
        else {
            // Either date failed to parse; only the fingerprint check remains.
            return false;
        };
        day_distance <= self.window_days
            && relative_difference(invoice.gross_total, candidate.gross_total)
                <= self.amount_tolerance
    }
}

fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        return 0.0;
    }
    (a - b).abs() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::traits::IKnowledgeStore;
    use engram_storage::SqliteStore;

    fn make_invoice(number: &str, invoice_date: &str, gross: f64) -> Invoice {
        Invoice {
            id: format!("doc-{number}"),
            vendor_name: "Supplier GmbH".to_string(),
            invoice_number: number.to_string(),
            invoice_date: invoice_date.to_string(),
            service_date: None,
            currency: Some("EUR".to_string()),
            po_number: None,
            net_total: gross / 1.19,
            tax_total: gross - gross / 1.19,
            gross_total: gross,
            tax_rate: 0.19,
            line_items: vec![],
            discount_terms: None,
            extraction_confidence: 0.9,
            raw_text: String::new(),
        }
    }

    fn guard() -> DuplicateGuard {
        DuplicateGuard::new(&EngramConfig::default())
    }

    #[test]
    fn round_trip_flags_near_identical_documents() {
        let store = SqliteStore::open_in_memory().unwrap();
        let guard = guard();

        let original = make_invoice("R-1001", "15.01.2024", 1190.0);
        guard.record(&store, &original).unwrap();

        // Three days later, amount within 1%.
        let near = make_invoice("R-1001", "18.01.2024", 1195.0);
        assert!(guard.check(&store, &near).unwrap().is_some());
    }

    #[test]
    fn outside_the_envelope_is_not_a_duplicate() {
        let store = SqliteStore::open_in_memory().unwrap();
        let guard = guard();

        guard.record(&store, &make_invoice("R-1001", "15.01.2024", 1190.0)).unwrap();

        // More than 7 days apart.
        let late = make_invoice("R-1001", "25.01.2024", 1190.5);
        assert!(guard.check(&store, &late).unwrap().is_none());

        // More than 1% apart.
        let off = make_invoice("R-1001", "16.01.2024", 1250.0);
        assert!(guard.check(&store, &off).unwrap().is_none());
    }

    #[test]
    fn unparsable_dates_fall_back_to_fingerprint_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        let guard = guard();

        guard.record(&store, &make_invoice("R-1001", "mid January", 1190.0)).unwrap();

        // Same fingerprint (vendor, number, amount) despite the garbage date.
        let same = make_invoice("R-1001", "still January", 1190.0);
        assert!(guard.check(&store, &same).unwrap().is_some());

        // Different amount: no fingerprint match, no date to compare.
        let different = make_invoice("R-1001", "later", 1300.0);
        assert!(guard.check(&store, &different).unwrap().is_none());
    }

    #[test]
    fn mixed_date_formats_still_compare() {
        let store = SqliteStore::open_in_memory().unwrap();
        let guard = guard();

        guard.record(&store, &make_invoice("R-1001", "2024-01-15", 1190.0)).unwrap();
        let near = make_invoice("R-1001", "17.01.2024", 1190.0);
        assert!(guard.check(&store, &near).unwrap().is_some());
    }

    #[test]
    fn record_appends_distinct_entries() {
        let store = SqliteStore::open_in_memory().unwrap();
        let guard = guard();
        let invoice = make_invoice("R-1001", "15.01.2024", 1190.0);

        guard.record(&store, &invoice).unwrap();
        guard.record(&store, &invoice).unwrap();

        let entries = store
            .processed_by_vendor_number("Supplier GmbH", "R-1001")
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
}
