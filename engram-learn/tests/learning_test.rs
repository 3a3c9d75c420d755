//! Learn-stage behavior against the real store: lazy vendor creation, the
//! update rules, reinforcement arithmetic, batch tolerance, and the ledger
//! hand-off.

use engram_core::config::EngramConfig;
use engram_core::document::{Invoice, LineItem};
use engram_core::memory::{CorrectionKind, Resolution};
use engram_core::models::{
    CorrectionTarget, DocumentField, FieldCorrection, HumanCorrection, LineItemField,
    MemoryUpdateKind,
};
use engram_core::traits::IKnowledgeStore;
use engram_learn::LearnEngine;
use engram_storage::SqliteStore;

fn make_invoice() -> Invoice {
    Invoice {
        id: "doc-1".to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        invoice_number: "R-1001".to_string(),
        invoice_date: "15.01.2024".to_string(),
        service_date: None,
        currency: None,
        po_number: None,
        net_total: 1000.0,
        tax_total: 190.0,
        gross_total: 1190.0,
        tax_rate: 0.19,
        line_items: vec![LineItem {
            description: "Industrial Widget 3mm".to_string(),
            sku: None,
            quantity: 10.0,
            unit_price: 100.0,
        }],
        discount_terms: None,
        extraction_confidence: 0.9,
        raw_text: "Leistungsdatum: 15.01.2024".to_string(),
    }
}

fn service_date_batch(decision: Resolution) -> HumanCorrection {
    HumanCorrection {
        document_id: "doc-1".to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        corrections: vec![FieldCorrection {
            target: CorrectionTarget::document(DocumentField::ServiceDate),
            from: None,
            to: "2024-01-15".to_string(),
            reason: "extracted via Leistungsdatum label".to_string(),
        }],
        final_decision: decision,
    }
}

#[test]
fn vendor_memory_is_created_lazily() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());
    assert!(store.get_vendor("Supplier GmbH").unwrap().is_none());

    engine
        .learn(&store, &make_invoice(), &service_date_batch(Resolution::Approved))
        .unwrap();

    let vendor = store.get_vendor("Supplier GmbH").unwrap().expect("created");
    assert_eq!(vendor.usage_count, 1);
}

#[test]
fn approved_service_date_creates_mapping_and_extraction_memory() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());

    let (updates, note) = engine
        .learn(&store, &make_invoice(), &service_date_batch(Resolution::Approved))
        .unwrap();

    let vendor = store.get_vendor("Supplier GmbH").unwrap().unwrap();
    let mapping = vendor
        .mapping_for(DocumentField::ServiceDate)
        .expect("field mapping learned");
    assert_eq!(mapping.source_label, "Leistungsdatum");
    assert_eq!(mapping.success_count, 1);

    let corrections = store.corrections_for_vendor("Supplier GmbH").unwrap();
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0].kind, CorrectionKind::ExtractFromRawText);
    assert_eq!(corrections[0].pattern, "Leistungsdatum");
    assert_eq!(corrections[0].success_count, 1);

    let resolutions = store.resolutions_for_vendor("Supplier GmbH").unwrap();
    assert_eq!(resolutions.len(), 1);
    assert_eq!(resolutions[0].resolution, Resolution::Approved);

    assert!(updates.iter().any(|u| u.kind == MemoryUpdateKind::Ledger));
    assert!(note.contains("1 corrections absorbed"));
}

#[test]
fn learning_twice_double_counts() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());
    let batch = service_date_batch(Resolution::Approved);

    engine.learn(&store, &make_invoice(), &batch).unwrap();
    engine.learn(&store, &make_invoice(), &batch).unwrap();

    let corrections = store.corrections_for_vendor("Supplier GmbH").unwrap();
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0].success_count, 2);

    let vendor = store.get_vendor("Supplier GmbH").unwrap().unwrap();
    assert_eq!(vendor.usage_count, 2);

    // Two ledger entries: record() appends unconditionally.
    let entries = store
        .processed_by_vendor_number("Supplier GmbH", "R-1001")
        .unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn rejected_batch_weakens_the_pattern() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());

    engine
        .learn(&store, &make_invoice(), &service_date_batch(Resolution::Approved))
        .unwrap();
    let confident = store.corrections_for_vendor("Supplier GmbH").unwrap()[0].confidence;

    engine
        .learn(&store, &make_invoice(), &service_date_batch(Resolution::Rejected))
        .unwrap();
    let weakened = store.corrections_for_vendor("Supplier GmbH").unwrap()[0].clone();

    assert_eq!(weakened.failure_count, 1);
    assert!(weakened.confidence < confident);
}

#[test]
fn currency_corrections_stick_even_when_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());

    let batch = HumanCorrection {
        document_id: "doc-1".to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        corrections: vec![FieldCorrection {
            target: CorrectionTarget::document(DocumentField::Currency),
            from: None,
            to: "EUR".to_string(),
            reason: "currency was omitted".to_string(),
        }],
        final_decision: Resolution::Rejected,
    };
    engine.learn(&store, &make_invoice(), &batch).unwrap();

    let vendor = store.get_vendor("Supplier GmbH").unwrap().unwrap();
    assert_eq!(vendor.default_currency.as_deref(), Some("EUR"));

    let corrections = store.corrections_for_vendor("Supplier GmbH").unwrap();
    assert_eq!(corrections[0].kind, CorrectionKind::SetCurrency);
    // Reinforced despite the rejected batch.
    assert_eq!(corrections[0].success_count, 1);
    assert_eq!(corrections[0].failure_count, 0);
}

#[test]
fn sku_corrections_learn_the_description_mapping() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());

    let batch = HumanCorrection {
        document_id: "doc-1".to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        corrections: vec![FieldCorrection {
            target: CorrectionTarget::line_item(0, LineItemField::Sku),
            from: None,
            to: "WID-3".to_string(),
            reason: "catalog lookup".to_string(),
        }],
        final_decision: Resolution::Approved,
    };
    engine.learn(&store, &make_invoice(), &batch).unwrap();

    let vendor = store.get_vendor("Supplier GmbH").unwrap().unwrap();
    let mapping = vendor
        .sku_for_description("Industrial Widget 3mm")
        .expect("sku mapping learned");
    assert_eq!(mapping.sku, "WID-3");

    let corrections = store.corrections_for_vendor("Supplier GmbH").unwrap();
    assert_eq!(corrections[0].kind, CorrectionKind::MapSku);
    assert_eq!(corrections[0].pattern, "Industrial Widget 3mm");
}

#[test]
fn out_of_range_line_item_is_skipped_not_fatal() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());

    let batch = HumanCorrection {
        document_id: "doc-1".to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        corrections: vec![
            FieldCorrection {
                target: CorrectionTarget::line_item(9, LineItemField::Sku),
                from: None,
                to: "GHOST".to_string(),
                reason: "phantom line".to_string(),
            },
            FieldCorrection {
                target: CorrectionTarget::document(DocumentField::Currency),
                from: None,
                to: "EUR".to_string(),
                reason: "currency was omitted".to_string(),
            },
        ],
        final_decision: Resolution::Approved,
    };

    let (_, note) = engine.learn(&store, &make_invoice(), &batch).unwrap();

    // The bad correction is surfaced, the good one still learned.
    assert!(note.contains("skipped"));
    assert!(note.contains("out of range"));
    let vendor = store.get_vendor("Supplier GmbH").unwrap().unwrap();
    assert_eq!(vendor.default_currency.as_deref(), Some("EUR"));
    // No resolution for the skipped correction.
    assert_eq!(store.resolutions_for_vendor("Supplier GmbH").unwrap().len(), 1);
}

#[test]
fn payment_terms_batch_sets_vendor_terms() {
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = LearnEngine::new(EngramConfig::default());

    let batch = HumanCorrection {
        document_id: "doc-1".to_string(),
        vendor_name: "Supplier GmbH".to_string(),
        corrections: vec![FieldCorrection {
            target: CorrectionTarget::document(DocumentField::DiscountTerms),
            from: None,
            to: "2% 10, net 30".to_string(),
            reason: "terms printed in the footer".to_string(),
        }],
        final_decision: Resolution::Approved,
    };
    engine.learn(&store, &make_invoice(), &batch).unwrap();

    let vendor = store.get_vendor("Supplier GmbH").unwrap().unwrap();
    assert_eq!(vendor.payment_terms.as_deref(), Some("2% 10, net 30"));
    let corrections = store.corrections_for_vendor("Supplier GmbH").unwrap();
    assert_eq!(corrections[0].kind, CorrectionKind::SetPaymentTerms);
}
