//! The overall-confidence computation, applied in this exact order:
//! base, vendor bonus, auto-applied averaging, pending and duplicate and
//! new-vendor penalties, final clamp.

use engram_core::memory::{Confidence, RecalledMemories};
use engram_core::models::ProposedCorrection;

pub fn overall_confidence(
    base_confidence: f64,
    proposals: &[ProposedCorrection],
    memories: &RecalledMemories,
    is_new_vendor: bool,
) -> Confidence {
    let mut score = base_confidence;

    if let Some(vendor) = &memories.vendor_memory {
        score = (score + 0.1 * vendor.confidence.value()).min(1.0);
    }

    let auto_applied: Vec<f64> = proposals
        .iter()
        .filter(|p| p.auto_applied)
        .map(|p| p.confidence.value())
        .collect();
    if !auto_applied.is_empty() {
        let mean = auto_applied.iter().sum::<f64>() / auto_applied.len() as f64;
        score = (score + mean) / 2.0;
    }

    if proposals.iter().any(|p| !p.auto_applied) {
        score *= 0.9;
    }

    if memories.potential_duplicate.is_some() {
        score *= 0.5;
    }

    if is_new_vendor {
        score *= 0.8;
    }

    Confidence::new(score.clamp(0.1, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::memory::VendorMemory;
    use engram_core::models::{CorrectionTarget, DocumentField};

    fn proposal(confidence: f64, auto_applied: bool) -> ProposedCorrection {
        let mut p = ProposedCorrection::new(
            CorrectionTarget::document(DocumentField::ServiceDate),
            None,
            "2024-01-15",
            Confidence::new(confidence),
            "test",
        );
        p.auto_applied = auto_applied;
        p
    }

    #[test]
    fn base_passes_through_with_no_signals() {
        let score = overall_confidence(0.9, &[], &RecalledMemories::default(), false);
        assert!((score.value() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn vendor_bonus_is_added_first() {
        let mut vendor = VendorMemory::new("Supplier GmbH");
        vendor.confidence = Confidence::new(0.8);
        let memories = RecalledMemories {
            vendor_memory: Some(vendor),
            ..Default::default()
        };
        let score = overall_confidence(0.9, &[], &memories, false);
        assert!((score.value() - 0.98).abs() < 1e-9);
    }

    #[test]
    fn auto_applied_average_then_pending_penalty() {
        let proposals = vec![proposal(0.9, true), proposal(0.5, false)];
        // (0.8 + 0.9) / 2 = 0.85, then × 0.9 = 0.765.
        let score = overall_confidence(0.8, &proposals, &RecalledMemories::default(), false);
        assert!((score.value() - 0.765).abs() < 1e-9);
    }

    #[test]
    fn penalties_multiply_in_order() {
        let proposals = vec![proposal(0.5, false)];
        let memories = RecalledMemories {
            potential_duplicate: Some(engram_core::models::ProcessedInvoice {
                invoice_number: "R-1".to_string(),
                vendor_name: "Supplier GmbH".to_string(),
                invoice_date: "15.01.2024".to_string(),
                gross_total: 1.0,
                processed_at: chrono::Utc::now(),
                fingerprint: "fp".to_string(),
            }),
            ..Default::default()
        };
        // 0.8 × 0.9 × 0.5 × 0.8 = 0.288.
        let score = overall_confidence(0.8, &proposals, &memories, true);
        assert!((score.value() - 0.288).abs() < 1e-9);
    }

    #[test]
    fn clamped_to_the_floor() {
        let score = overall_confidence(0.0, &[], &RecalledMemories::default(), true);
        assert!((score.value() - 0.1).abs() < 1e-9);
    }
}
