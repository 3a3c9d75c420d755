//! Field-mapping extraction: recover a missing schema field from the free
//! text, anchored by the vendor-specific source label.

use engram_core::document::Invoice;
use engram_core::memory::{CorrectionKind, RecalledMemories};
use engram_core::models::{CorrectionTarget, DocumentField, ProposedCorrection};
use engram_core::traits::ITextExtractor;

/// Proposals from vendor field mappings and recalled extract-from-raw-text
/// correction memories. Both are evaluated; the engine's tie-break keeps the
/// strongest proposal per target.
pub fn propose(
    extractor: &dyn ITextExtractor,
    invoice: &Invoice,
    memories: &RecalledMemories,
) -> Vec<ProposedCorrection> {
    let mut proposals = Vec::new();

    if let Some(vendor) = &memories.vendor_memory {
        for mapping in &vendor.field_mappings {
            if !field_is_missing(invoice, mapping.target_field) {
                continue;
            }
            let Some(value) = extract_for_field(extractor, invoice, mapping.target_field, &mapping.source_label)
            else {
                continue;
            };
            proposals.push(ProposedCorrection::new(
                CorrectionTarget::document(mapping.target_field),
                None,
                &value,
                mapping.confidence,
                &format!(
                    "extracted {value} from raw text via anchor label '{}'",
                    mapping.source_label
                ),
            ));
        }
    }

    for memory in &memories.correction_memories {
        if memory.kind != CorrectionKind::ExtractFromRawText {
            continue;
        }
        let CorrectionTarget::Document { field } = memory.target else {
            continue;
        };
        if !field_is_missing(invoice, field) {
            continue;
        }
        let Some(value) = extract_for_field(extractor, invoice, field, &memory.pattern) else {
            continue;
        };
        proposals.push(ProposedCorrection::new(
            memory.target,
            None,
            &value,
            memory.confidence,
            &format!(
                "extracted {value} from raw text via learned pattern '{}'",
                memory.pattern
            ),
        ));
    }

    proposals
}

/// Whether the document still lacks a usable value for `field`.
pub fn field_is_missing(invoice: &Invoice, field: DocumentField) -> bool {
    let empty = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());
    match field {
        DocumentField::ServiceDate => empty(&invoice.service_date),
        DocumentField::Currency => empty(&invoice.currency),
        DocumentField::PoNumber => empty(&invoice.po_number),
        DocumentField::DiscountTerms => empty(&invoice.discount_terms),
        // The remaining schema fields always carry a value on intake.
        _ => false,
    }
}

fn extract_for_field(
    extractor: &dyn ITextExtractor,
    invoice: &Invoice,
    field: DocumentField,
    anchor: &str,
) -> Option<String> {
    match field {
        DocumentField::ServiceDate | DocumentField::InvoiceDate => {
            extractor.labeled_date(&invoice.raw_text, anchor)
        }
        // Only date-valued fields are extractable by anchor label today.
        _ => None,
    }
}
