//! Payment terms: stored vendor terms normalize directly; free-text
//! discount terms only ever produce a pending proposal.

use engram_core::constants::TEXT_TERMS_CONFIDENCE;
use engram_core::document::Invoice;
use engram_core::memory::{Confidence, RecalledMemories};
use engram_core::models::{CorrectionTarget, DocumentField, ProposedCorrection};
use engram_core::traits::ITextExtractor;

use super::field_mapping::field_is_missing;

/// Outcome of the payment-terms source.
pub enum TermsOutcome {
    /// Stored vendor terms, written straight into the normalized document.
    Direct(String),
    /// Free-text extraction, pending approval.
    Proposal(ProposedCorrection),
    None,
}

pub fn resolve(
    extractor: &dyn ITextExtractor,
    invoice: &Invoice,
    memories: &RecalledMemories,
) -> TermsOutcome {
    if !field_is_missing(invoice, DocumentField::DiscountTerms) {
        return TermsOutcome::None;
    }

    if let Some(terms) = memories
        .vendor_memory
        .as_ref()
        .and_then(|vendor| vendor.payment_terms.as_deref())
    {
        return TermsOutcome::Direct(terms.to_string());
    }

    if let Some(terms) = extractor.discount_terms(&invoice.raw_text) {
        return TermsOutcome::Proposal(ProposedCorrection::pending_only(
            CorrectionTarget::document(DocumentField::DiscountTerms),
            None,
            &terms,
            Confidence::new(TEXT_TERMS_CONFIDENCE),
            &format!("discount terms '{terms}' found in document text"),
        ));
    }

    TermsOutcome::None
}
