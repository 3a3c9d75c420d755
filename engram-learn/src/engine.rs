//! LearnEngine: the single mutating stage. Not idempotent: learning the
//! same feedback twice double-counts reinforcement, so callers invoke it
//! exactly once per human decision.

use std::sync::PoisonError;

use tracing::{info, warn};

use engram_core::config::EngramConfig;
use engram_core::document::Invoice;
use engram_core::errors::EngramResult;
use engram_core::memory::{CorrectionKind, CorrectionMemory, ResolutionMemory, VendorMemory};
use engram_core::models::{
    CorrectionTarget, FieldCorrection, HumanCorrection, MemoryUpdate, MemoryUpdateKind,
};
use engram_core::traits::IKnowledgeStore;
use engram_dedup::DuplicateGuard;

use crate::rules::{self, UpdateStrategy, SERVICE_DATE_ANCHOR};
use crate::vendor_locks::VendorLocks;

pub struct LearnEngine {
    guard: DuplicateGuard,
    locks: VendorLocks,
}

impl LearnEngine {
    pub fn new(config: EngramConfig) -> Self {
        Self {
            guard: DuplicateGuard::new(&config),
            locks: VendorLocks::new(),
        }
    }

    /// Absorb one human correction batch for one document.
    ///
    /// Serialized per vendor. Malformed field corrections are skipped with a
    /// warning; the rest of the batch still learns. Recording the document in
    /// the processed ledger is the final step and the single point where it
    /// becomes visible to duplicate checks.
    pub fn learn(
        &self,
        store: &dyn IKnowledgeStore,
        invoice: &Invoice,
        human: &HumanCorrection,
    ) -> EngramResult<(Vec<MemoryUpdate>, String)> {
        let lock = self.locks.lock_for(&invoice.vendor_name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let approved = human.is_approved();
        let mut updates: Vec<MemoryUpdate> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();

        let mut vendor = match store.get_vendor(&invoice.vendor_name)? {
            Some(vendor) => vendor,
            None => VendorMemory::new(&invoice.vendor_name),
        };

        for correction in &human.corrections {
            if let Some(index) = correction.target.line_item_index() {
                if index >= invoice.line_items.len() {
                    warn!(
                        vendor = %invoice.vendor_name,
                        index,
                        "correction references a line item the document does not have; skipped"
                    );
                    skipped.push(format!("{}: line-item index out of range", correction.target));
                    continue;
                }
            }

            if let Some(strategy) = rules::match_rule(&correction.target, &correction.reason) {
                self.apply_strategy(
                    store,
                    &mut vendor,
                    invoice,
                    correction,
                    strategy,
                    approved,
                    &mut updates,
                )?;
            }

            self.reinforce_matching(store, &invoice.vendor_name, correction, approved, &mut updates)?;

            let resolution = ResolutionMemory::new(
                &invoice.id,
                &invoice.vendor_name,
                &correction.target.to_string(),
                correction.from.as_deref(),
                &correction.to,
                human.final_decision,
                &correction.reason,
            );
            store.append_resolution(&resolution)?;
            updates.push(MemoryUpdate::new(
                MemoryUpdateKind::Resolution,
                &resolution.id,
                &format!("{} {}", human.final_decision, correction.target),
            ));
        }

        // The usage bump is implicit in learning, not in reading.
        vendor.record_use();
        store.put_vendor(&vendor)?;
        updates.push(MemoryUpdate::new(
            MemoryUpdateKind::Vendor,
            &vendor.vendor_name,
            &format!(
                "usage {} confidence {}",
                vendor.usage_count, vendor.confidence
            ),
        ));

        let entry = self.guard.record(store, invoice)?;
        updates.push(MemoryUpdate::new(
            MemoryUpdateKind::Ledger,
            &entry.fingerprint,
            &format!("recorded invoice {}", entry.invoice_number),
        ));

        info!(
            vendor = %invoice.vendor_name,
            corrections = human.corrections.len(),
            skipped = skipped.len(),
            approved,
            "learned from human feedback"
        );

        let note = if skipped.is_empty() {
            format!(
                "learn: {} corrections absorbed ({}), document recorded",
                human.corrections.len() - skipped.len(),
                human.final_decision,
            )
        } else {
            format!(
                "learn: {} corrections absorbed ({}), {} skipped [{}], document recorded",
                human.corrections.len() - skipped.len(),
                human.final_decision,
                skipped.len(),
                skipped.join("; "),
            )
        };

        Ok((updates, note))
    }

    /// Field-specific update: vendor sub-memory plus the existence of a
    /// correction-memory pattern. Counting happens in the generic pass.
    #[allow(clippy::too_many_arguments)]
    fn apply_strategy(
        &self,
        store: &dyn IKnowledgeStore,
        vendor: &mut VendorMemory,
        invoice: &Invoice,
        correction: &FieldCorrection,
        strategy: UpdateStrategy,
        approved: bool,
        updates: &mut Vec<MemoryUpdate>,
    ) -> EngramResult<()> {
        match strategy {
            UpdateStrategy::ExtractionMapping => {
                if let CorrectionTarget::Document { field } = correction.target {
                    vendor.record_field_mapping(SERVICE_DATE_ANCHOR, field, approved);
                }
                self.ensure_correction_memory(
                    store,
                    &vendor.vendor_name,
                    correction.target,
                    SERVICE_DATE_ANCHOR,
                    CorrectionKind::ExtractFromRawText,
                    &correction.to,
                    updates,
                )?;
            }
            UpdateStrategy::TaxRecalculation => {
                vendor.record_tax_behavior(true, invoice.tax_rate, approved);
                self.ensure_correction_memory(
                    store,
                    &vendor.vendor_name,
                    correction.target,
                    &correction.reason,
                    CorrectionKind::RecalculateTax,
                    &correction.to,
                    updates,
                )?;
            }
            UpdateStrategy::CurrencyDefault => {
                // Currency corrections stick regardless of the batch verdict.
                vendor.default_currency = Some(correction.to.clone());
                self.ensure_correction_memory(
                    store,
                    &vendor.vendor_name,
                    correction.target,
                    &correction.reason,
                    CorrectionKind::SetCurrency,
                    &correction.to,
                    updates,
                )?;
            }
            UpdateStrategy::PoMatching => {
                self.ensure_correction_memory(
                    store,
                    &vendor.vendor_name,
                    correction.target,
                    &correction.reason,
                    CorrectionKind::MatchPo,
                    &correction.to,
                    updates,
                )?;
            }
            UpdateStrategy::SkuMapping => {
                let Some(index) = correction.target.line_item_index() else {
                    return Ok(());
                };
                // Index already validated against the document.
                let description = invoice.line_items[index].description.clone();
                if approved {
                    vendor.record_sku_mapping(&description, &correction.to);
                }
                self.ensure_correction_memory(
                    store,
                    &vendor.vendor_name,
                    correction.target,
                    &description,
                    CorrectionKind::MapSku,
                    &correction.to,
                    updates,
                )?;
            }
            UpdateStrategy::PaymentTerms => {
                if approved {
                    vendor.payment_terms = Some(correction.to.clone());
                }
                self.ensure_correction_memory(
                    store,
                    &vendor.vendor_name,
                    correction.target,
                    &correction.reason,
                    CorrectionKind::SetPaymentTerms,
                    &correction.to,
                    updates,
                )?;
            }
        }
        Ok(())
    }

    /// Create the (vendor, target, pattern) correction memory if it does not
    /// exist yet, with zero counts.
    #[allow(clippy::too_many_arguments)]
    fn ensure_correction_memory(
        &self,
        store: &dyn IKnowledgeStore,
        vendor_name: &str,
        target: CorrectionTarget,
        pattern: &str,
        kind: CorrectionKind,
        value: &str,
        updates: &mut Vec<MemoryUpdate>,
    ) -> EngramResult<()> {
        let exists = store
            .corrections_for_vendor(vendor_name)?
            .into_iter()
            .any(|memory| memory.target == target && memory.pattern == pattern);
        if exists {
            return Ok(());
        }

        let memory = CorrectionMemory::new(vendor_name, target, pattern, kind, value);
        store.insert_correction(&memory)?;
        updates.push(MemoryUpdate::new(
            MemoryUpdateKind::Correction,
            &memory.id,
            &format!("created {kind} pattern '{pattern}' for {target}"),
        ));
        Ok(())
    }

    /// The generic pass: every correction memory matching (vendor, target)
    /// is reinforced on approval and weakened on rejection, except currency
    /// memories, which are always reinforced.
    fn reinforce_matching(
        &self,
        store: &dyn IKnowledgeStore,
        vendor_name: &str,
        correction: &FieldCorrection,
        approved: bool,
        updates: &mut Vec<MemoryUpdate>,
    ) -> EngramResult<()> {
        let matching = store
            .corrections_for_vendor(vendor_name)?
            .into_iter()
            .filter(|memory| memory.target == correction.target);

        for mut memory in matching {
            let reinforce = approved || memory.kind == CorrectionKind::SetCurrency;
            if reinforce {
                memory.reinforce();
                memory.correction_value = correction.to.clone();
            } else {
                memory.weaken();
            }
            store.update_correction(&memory)?;
            updates.push(MemoryUpdate::new(
                MemoryUpdateKind::Correction,
                &memory.id,
                &format!(
                    "{} {} pattern '{}' to confidence {}",
                    if reinforce { "reinforced" } else { "weakened" },
                    memory.kind,
                    memory.pattern,
                    memory.confidence
                ),
            ));
        }
        Ok(())
    }
}
