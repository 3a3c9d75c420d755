//! Currency recovery: vendor default first, free text second.
//! Currency proposals are never auto-applied.

use engram_core::constants::{TEXT_CURRENCY_CONFIDENCE, VENDOR_CURRENCY_CONFIDENCE};
use engram_core::document::Invoice;
use engram_core::memory::{Confidence, RecalledMemories};
use engram_core::models::{CorrectionTarget, DocumentField, ProposedCorrection};
use engram_core::traits::ITextExtractor;

use super::field_mapping::field_is_missing;

pub fn propose(
    extractor: &dyn ITextExtractor,
    invoice: &Invoice,
    memories: &RecalledMemories,
) -> Vec<ProposedCorrection> {
    if !field_is_missing(invoice, DocumentField::Currency) {
        return Vec::new();
    }

    let vendor_default = memories
        .vendor_memory
        .as_ref()
        .and_then(|vendor| vendor.default_currency.as_deref());

    // Vendor memory takes priority over free-text extraction.
    if let Some(code) = vendor_default {
        return vec![ProposedCorrection::pending_only(
            CorrectionTarget::document(DocumentField::Currency),
            None,
            code,
            Confidence::new(VENDOR_CURRENCY_CONFIDENCE),
            &format!("currency missing; vendor default is {code}"),
        )];
    }

    if let Some(code) = extractor.currency_code(&invoice.raw_text) {
        return vec![ProposedCorrection::pending_only(
            CorrectionTarget::document(DocumentField::Currency),
            None,
            &code,
            Confidence::new(TEXT_CURRENCY_CONFIDENCE),
            &format!("currency missing; found {code} in document text"),
        )];
    }

    Vec::new()
}
