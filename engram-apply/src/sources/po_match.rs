//! Purchase-order matching by SKU overlap.

use engram_core::constants::SINGLE_PO_FALLBACK_CONFIDENCE;
use engram_core::document::{Invoice, PurchaseOrder};
use engram_core::memory::Confidence;
use engram_core::models::{CorrectionTarget, DocumentField, ProposedCorrection};

use super::field_mapping::field_is_missing;

pub fn propose(invoice: &Invoice, purchase_orders: &[PurchaseOrder]) -> Vec<ProposedCorrection> {
    if !field_is_missing(invoice, DocumentField::PoNumber) || purchase_orders.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<&PurchaseOrder> = purchase_orders
        .iter()
        .filter(|po| po.vendor_name.eq_ignore_ascii_case(&invoice.vendor_name))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let invoice_skus = invoice.known_skus();
    let single_candidate = candidates.len() == 1;

    // Best overlap-based match across all candidate POs.
    let best = candidates
        .iter()
        .filter_map(|po| {
            let overlap = overlap_ratio(&invoice_skus, po);
            (overlap > 0.0).then(|| {
                let bonus = if single_candidate { 0.2 } else { 0.0 };
                let confidence = (0.5 + 0.3 * overlap + bonus).min(0.95);
                (*po, overlap, confidence)
            })
        })
        .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((po, overlap, confidence)) = best {
        return vec![ProposedCorrection::new(
            CorrectionTarget::document(DocumentField::PoNumber),
            None,
            &po.po_number,
            Confidence::new(confidence),
            &format!(
                "purchase order {} matches {:.0}% of line-item SKUs",
                po.po_number,
                overlap * 100.0
            ),
        )];
    }

    // No overlap anywhere, but only one PO exists for this vendor.
    if single_candidate {
        let po = candidates[0];
        return vec![ProposedCorrection::new(
            CorrectionTarget::document(DocumentField::PoNumber),
            None,
            &po.po_number,
            Confidence::new(SINGLE_PO_FALLBACK_CONFIDENCE),
            &format!(
                "no SKU overlap, but {} is the only open purchase order for this vendor",
                po.po_number
            ),
        )];
    }

    Vec::new()
}

/// Share of the invoice's SKUs present on the purchase order.
fn overlap_ratio(invoice_skus: &[&str], po: &PurchaseOrder) -> f64 {
    if invoice_skus.is_empty() {
        return 0.0;
    }
    let matched = invoice_skus
        .iter()
        .filter(|sku| po.skus.iter().any(|candidate| candidate.eq_ignore_ascii_case(sku)))
        .count();
    matched as f64 / invoice_skus.len() as f64
}
