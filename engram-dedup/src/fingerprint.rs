//! Stable content fingerprints over (vendor, document number, gross total).

use engram_core::document::Invoice;

/// blake3 hex over the canonical identity string. The gross total is
/// rendered to two decimals so float noise does not split fingerprints.
pub fn fingerprint(vendor_name: &str, invoice_number: &str, gross_total: f64) -> String {
    let canonical = format!(
        "{}|{}|{:.2}",
        vendor_name.trim().to_lowercase(),
        invoice_number.trim().to_lowercase(),
        gross_total
    );
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Fingerprint of an incoming document.
pub fn of_invoice(invoice: &Invoice) -> String {
    fingerprint(&invoice.vendor_name, &invoice.invoice_number, invoice.gross_total)
}
