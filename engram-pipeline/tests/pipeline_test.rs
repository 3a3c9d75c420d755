//! End-to-end pipeline scenarios against the real in-memory store:
//! new-vendor escalation, the Leistungsdatum learning round-trip, duplicate
//! quarantine, idempotent reads, and escalation independence.

use std::sync::Arc;

use engram_core::document::{Invoice, LineItem};
use engram_core::memory::Resolution;
use engram_core::models::{
    CorrectionTarget, DocumentField, Escalation, FieldCorrection, HumanCorrection, PipelineStep,
};
use engram_core::traits::IKnowledgeStore;
use engram_pipeline::Engine;
use engram_storage::SqliteStore;

fn make_invoice(id: &str, number: &str, date: &str, gross: f64) -> Invoice {
    Invoice {
        id: id.to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        invoice_number: number.to_string(),
        invoice_date: date.to_string(),
        service_date: None,
        currency: Some("EUR".to_string()),
        po_number: None,
        net_total: gross / 1.19,
        tax_total: gross - gross / 1.19,
        gross_total: gross,
        tax_rate: 0.19,
        line_items: vec![LineItem {
            description: "Industrial Widget 3mm".to_string(),
            sku: None,
            quantity: 10.0,
            unit_price: 100.0,
        }],
        discount_terms: None,
        extraction_confidence: 0.9,
        raw_text: format!("Rechnung {number}\nLeistungsdatum: 15.01.2024"),
    }
}

fn service_date_feedback(document_id: &str) -> HumanCorrection {
    HumanCorrection {
        document_id: document_id.to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        corrections: vec![FieldCorrection {
            target: CorrectionTarget::document(DocumentField::ServiceDate),
            from: None,
            to: "2024-01-15".to_string(),
            reason: "extracted via Leistungsdatum label".to_string(),
        }],
        final_decision: Resolution::Approved,
    }
}

fn setup() -> (Arc<SqliteStore>, Engine) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let engine = Engine::with_defaults(store.clone());
    (store, engine)
}

// ── Scenario A: first contact with a vendor ───────────────────────────────

#[test]
fn first_document_from_a_new_vendor_requires_review() {
    let (_, engine) = setup();
    let invoice = make_invoice("doc-1", "R-1001", "15.01.2024", 1190.0);

    let outcome = engine.process(&invoice, &[]).unwrap();

    assert!(outcome.requires_review());
    assert!(outcome.decision.escalations.iter().any(|e| matches!(
        e,
        Escalation::InsufficientVendorHistory { prior_uses: 0, .. }
    )));
    assert!(outcome.memory_updates.is_empty());
    assert_eq!(outcome.audit_trail.len(), 3);
}

// ── Scenario B: the Leistungsdatum round-trip ─────────────────────────────

#[test]
fn approved_correction_teaches_the_next_document() {
    let (store, engine) = setup();

    let first = make_invoice("doc-1", "R-1001", "15.01.2024", 1190.0);
    engine.process(&first, &[]).unwrap();
    let (updates, _) = engine.absorb(&first, &service_date_feedback("doc-1")).unwrap();
    assert!(!updates.is_empty());

    // A later document from the same vendor, service date again missing.
    let second = make_invoice("doc-2", "R-2002", "01.03.2024", 800.0);
    let outcome = engine.process(&second, &[]).unwrap();

    let proposal = outcome
        .proposals
        .iter()
        .find(|p| p.target.is_document_field(DocumentField::ServiceDate))
        .expect("learned mapping should fire");
    assert_eq!(proposal.proposed_value, "2024-01-15");
    assert!(proposal.confidence.value() > 0.4);

    // The learned pattern is persisted, not session state.
    assert_eq!(store.corrections_for_vendor("Supplier GmbH").unwrap().len(), 1);
}

// ── Scenario C: duplicate quarantine ──────────────────────────────────────

#[test]
fn near_duplicate_of_a_learned_document_is_quarantined() {
    let (store, engine) = setup();

    let original = make_invoice("doc-1", "R-1001", "15.01.2024", 1190.0);
    engine.process(&original, &[]).unwrap();
    engine.absorb(&original, &service_date_feedback("doc-1")).unwrap();

    // Same vendor and number, three days later, amount within 1%.
    let duplicate = make_invoice("doc-2", "R-1001", "18.01.2024", 1195.0);
    let outcome = engine.process(&duplicate, &[]).unwrap();

    assert!(outcome.requires_review());
    assert!(outcome
        .decision
        .escalations
        .iter()
        .any(|e| matches!(e, Escalation::PotentialDuplicate { .. })));
    assert!(outcome.reasoning().contains("duplicate"));

    // The caller heeds the flag: no learn, so the ledger still has one entry
    // and the memories are untouched.
    assert_eq!(
        store.processed_by_vendor_number("Supplier GmbH", "R-1001").unwrap().len(),
        1
    );
    assert_eq!(store.get_vendor("Supplier GmbH").unwrap().unwrap().usage_count, 1);
}

// ── Idempotent reads ──────────────────────────────────────────────────────

#[test]
fn processing_is_idempotent_on_unchanged_memory() {
    let (_, engine) = setup();
    let invoice = make_invoice("doc-1", "R-1001", "15.01.2024", 1190.0);

    let first = engine.process(&invoice, &[]).unwrap();
    let second = engine.process(&invoice, &[]).unwrap();

    assert_eq!(first.invoice, second.invoice);
    assert_eq!(first.proposals, second.proposals);
    assert_eq!(first.decision, second.decision);
}

// ── Escalation independence ───────────────────────────────────────────────

#[test]
fn pending_correction_blocks_auto_accept_despite_high_confidence() {
    let (_, engine) = setup();

    // Build history: two approved documents season the vendor.
    for (id, number) in [("doc-1", "R-1"), ("doc-2", "R-2")] {
        let invoice = make_invoice(id, number, "15.01.2024", 1190.0);
        engine.process(&invoice, &[]).unwrap();
        engine.absorb(&invoice, &service_date_feedback(id)).unwrap();
    }

    // High extraction confidence, but the learned mapping is still pending.
    let mut next = make_invoice("doc-3", "R-3", "01.02.2024", 500.0);
    next.extraction_confidence = 0.95;
    let outcome = engine.process(&next, &[]).unwrap();

    assert!(outcome
        .proposals
        .iter()
        .any(|p| !p.auto_applied && p.confidence.value() >= 0.4));
    assert!(outcome.requires_review());
    assert!(outcome
        .decision
        .escalations
        .iter()
        .any(|e| matches!(e, Escalation::PendingCorrection { .. })));
}

// ── Audit trail ───────────────────────────────────────────────────────────

#[test]
fn the_audit_trail_spans_all_four_steps() {
    let (_, engine) = setup();
    let invoice = make_invoice("doc-1", "R-1001", "15.01.2024", 1190.0);

    engine.process(&invoice, &[]).unwrap();
    engine.absorb(&invoice, &service_date_feedback("doc-1")).unwrap();

    let trail = engine.audit_trail("doc-1").unwrap();
    let steps: Vec<PipelineStep> = trail.iter().map(|entry| entry.step).collect();
    assert_eq!(
        steps,
        vec![
            PipelineStep::Recall,
            PipelineStep::Apply,
            PipelineStep::Decide,
            PipelineStep::Learn
        ]
    );
    assert!(trail[0].detail.starts_with("recall:"));
    assert!(trail[3].referenced_memory_ids.len() > 1);
}
