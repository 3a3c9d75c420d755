//! Tax recalculation: when the vendor quotes VAT-inclusive totals and the
//! document says so too, recompute gross and tax from the quoted total.

use engram_core::document::Invoice;
use engram_core::memory::RecalledMemories;
use engram_core::models::{CorrectionTarget, DocumentField, ProposedCorrection};
use engram_core::traits::ITextExtractor;

const CENT: f64 = 0.01;

/// Two linked proposals (gross, tax) sharing the tax-behavior confidence,
/// or nothing when the recomputation matches the document already.
pub fn propose(
    extractor: &dyn ITextExtractor,
    invoice: &Invoice,
    memories: &RecalledMemories,
) -> Vec<ProposedCorrection> {
    let Some(vendor) = &memories.vendor_memory else {
        return Vec::new();
    };
    let Some(behavior) = &vendor.tax_behavior else {
        return Vec::new();
    };
    if !behavior.is_inclusive || !extractor.mentions_inclusive_tax(&invoice.raw_text) {
        return Vec::new();
    }
    let Some(quoted_total) = extractor.total_amount(&invoice.raw_text) else {
        return Vec::new();
    };

    let rate = if invoice.tax_rate > 0.0 {
        invoice.tax_rate
    } else {
        behavior.default_rate
    };
    let gross = quoted_total;
    let tax = gross - gross / (1.0 + rate);

    if (gross - invoice.gross_total).abs() < CENT && (tax - invoice.tax_total).abs() < CENT {
        return Vec::new();
    }

    let reasoning = format!(
        "vendor quotes VAT-inclusive totals; recomputed from quoted total {quoted_total:.2} at rate {rate:.2}"
    );
    vec![
        ProposedCorrection::new(
            CorrectionTarget::document(DocumentField::GrossTotal),
            Some(&format!("{:.2}", invoice.gross_total)),
            &format!("{gross:.2}"),
            behavior.confidence,
            &reasoning,
        ),
        ProposedCorrection::new(
            CorrectionTarget::document(DocumentField::TaxTotal),
            Some(&format!("{:.2}", invoice.tax_total)),
            &format!("{tax:.2}"),
            behavior.confidence,
            &reasoning,
        ),
    ]
}
