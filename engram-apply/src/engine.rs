//! ApplyEngine: normalization plus the additive correction sources.

use std::collections::HashMap;

use tracing::{debug, warn};

use engram_core::config::EngramConfig;
use engram_core::constants::UNKNOWN_SKU;
use engram_core::document::{Invoice, PurchaseOrder};
use engram_core::memory::RecalledMemories;
use engram_core::models::{CorrectionTarget, DocumentField, LineItemField, ProposedCorrection};
use engram_core::traits::ITextExtractor;

use crate::sources;
use crate::sources::terms::TermsOutcome;

pub struct ApplyEngine {
    config: EngramConfig,
}

impl ApplyEngine {
    pub fn new(config: EngramConfig) -> Self {
        Self { config }
    }

    /// Normalize the document and propose corrections.
    ///
    /// Pure with respect to the knowledge store: same inputs, same outputs.
    /// Returns the normalized copy, the surviving proposals (auto-applied
    /// ones already written into the copy), and an audit note.
    pub fn apply(
        &self,
        extractor: &dyn ITextExtractor,
        invoice: &Invoice,
        memories: &RecalledMemories,
        purchase_orders: &[PurchaseOrder],
    ) -> (Invoice, Vec<ProposedCorrection>, String) {
        let mut normalized = invoice.clone();
        let mut notes: Vec<String> = Vec::new();

        // Canonical line-item shape: every item carries a SKU, if only the sentinel.
        for item in &mut normalized.line_items {
            if item.sku_is_missing() {
                item.sku = Some(UNKNOWN_SKU.to_string());
            }
        }

        // Stored vendor payment terms normalize directly, without a proposal.
        let mut terms_proposal = None;
        match sources::terms::resolve(extractor, invoice, memories) {
            TermsOutcome::Direct(terms) => {
                notes.push(format!("payment terms '{terms}' applied from vendor memory"));
                normalized.discount_terms = Some(terms);
            }
            TermsOutcome::Proposal(proposal) => terms_proposal = Some(proposal),
            TermsOutcome::None => {}
        }

        // Independent, additive sources.
        let mut proposals: Vec<ProposedCorrection> = Vec::new();
        proposals.extend(sources::field_mapping::propose(extractor, invoice, memories));
        proposals.extend(sources::tax::propose(extractor, invoice, memories));
        proposals.extend(sources::currency::propose(extractor, invoice, memories));
        proposals.extend(sources::sku::propose(invoice, memories));
        proposals.extend(terms_proposal);
        proposals.extend(sources::po_match::propose(invoice, purchase_orders));

        let mut proposals = resolve_competing(proposals);

        // The configured threshold can only tighten the fixed policy.
        for proposal in &mut proposals {
            if proposal.auto_applied
                && proposal.confidence.value() < self.config.auto_apply_threshold
            {
                proposal.auto_applied = false;
            }
        }

        let auto_applied = proposals.iter().filter(|p| p.auto_applied).count();
        for proposal in proposals.iter().filter(|p| p.auto_applied) {
            write_value(&mut normalized, proposal.target, &proposal.proposed_value);
        }

        debug!(
            vendor = %invoice.vendor_name,
            proposals = proposals.len(),
            auto_applied,
            "apply stage complete"
        );

        notes.push(format!(
            "apply: {} proposals ({auto_applied} auto-applied, {} pending)",
            proposals.len(),
            proposals.len() - auto_applied,
        ));

        (normalized, proposals, notes.join("; "))
    }
}

/// Keep the highest-confidence proposal per target; earlier sources win ties.
fn resolve_competing(proposals: Vec<ProposedCorrection>) -> Vec<ProposedCorrection> {
    let mut selected: Vec<ProposedCorrection> = Vec::new();
    let mut index_by_target: HashMap<CorrectionTarget, usize> = HashMap::new();

    for proposal in proposals {
        match index_by_target.get(&proposal.target) {
            Some(&i) => {
                if proposal.confidence > selected[i].confidence {
                    selected[i] = proposal;
                }
            }
            None => {
                index_by_target.insert(proposal.target, selected.len());
                selected.push(proposal);
            }
        }
    }
    selected
}

/// Write an accepted value into the normalized document.
fn write_value(invoice: &mut Invoice, target: CorrectionTarget, value: &str) {
    let parse_number = |raw: &str| -> Option<f64> {
        raw.parse().ok().or_else(|| {
            warn!(value = %raw, "auto-applied numeric correction did not parse; skipped");
            None
        })
    };

    match target {
        CorrectionTarget::Document { field } => match field {
            DocumentField::InvoiceNumber => invoice.invoice_number = value.to_string(),
            DocumentField::InvoiceDate => invoice.invoice_date = value.to_string(),
            DocumentField::ServiceDate => invoice.service_date = Some(value.to_string()),
            DocumentField::Currency => invoice.currency = Some(value.to_string()),
            DocumentField::PoNumber => invoice.po_number = Some(value.to_string()),
            DocumentField::DiscountTerms => invoice.discount_terms = Some(value.to_string()),
            DocumentField::NetTotal => {
                if let Some(v) = parse_number(value) {
                    invoice.net_total = v;
                }
            }
            DocumentField::TaxTotal => {
                if let Some(v) = parse_number(value) {
                    invoice.tax_total = v;
                }
            }
            DocumentField::GrossTotal => {
                if let Some(v) = parse_number(value) {
                    invoice.gross_total = v;
                }
            }
            DocumentField::TaxRate => {
                if let Some(v) = parse_number(value) {
                    invoice.tax_rate = v;
                }
            }
        },
        CorrectionTarget::LineItem { index, field } => {
            let Some(item) = invoice.line_items.get_mut(index) else {
                warn!(index, "auto-applied correction targets a missing line item; skipped");
                return;
            };
            match field {
                LineItemField::Sku => item.sku = Some(value.to_string()),
                LineItemField::Description => item.description = value.to_string(),
                LineItemField::Quantity => {
                    if let Some(v) = parse_number(value) {
                        item.quantity = v;
                    }
                }
                LineItemField::UnitPrice => {
                    if let Some(v) = parse_number(value) {
                        item.unit_price = v;
                    }
                }
            }
        }
    }
}
