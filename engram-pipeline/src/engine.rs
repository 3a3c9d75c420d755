//! The pipeline engine: owns the store handle, the extractor, and the four
//! stage engines.

use std::sync::Arc;

use tracing::info;

use engram_apply::ApplyEngine;
use engram_core::config::EngramConfig;
use engram_core::document::{Invoice, PurchaseOrder};
use engram_core::errors::EngramResult;
use engram_core::models::{
    AuditEntry, HumanCorrection, MemoryUpdate, PipelineOutcome, PipelineStep,
};
use engram_core::traits::{IKnowledgeStore, ITextExtractor};
use engram_decide::DecideEngine;
use engram_extract::RegexExtractor;
use engram_learn::LearnEngine;
use engram_recall::RecallEngine;

pub struct Engine {
    store: Arc<dyn IKnowledgeStore>,
    extractor: Arc<dyn ITextExtractor>,
    recall: RecallEngine,
    apply: ApplyEngine,
    decide: DecideEngine,
    learn: LearnEngine,
}

impl Engine {
    pub fn new(
        store: Arc<dyn IKnowledgeStore>,
        extractor: Arc<dyn ITextExtractor>,
        config: EngramConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            recall: RecallEngine::new(config.clone()),
            apply: ApplyEngine::new(config.clone()),
            decide: DecideEngine::new(config.clone()),
            learn: LearnEngine::new(config),
        }
    }

    /// Default configuration and the built-in regex extractor.
    pub fn with_defaults(store: Arc<dyn IKnowledgeStore>) -> Self {
        Self::new(store, Arc::new(RegexExtractor::new()), EngramConfig::default())
    }

    /// The read path: Recall → Apply → Decide for one document.
    ///
    /// Memory tables are untouched; only the audit log grows. Repeated calls
    /// on unchanged memory state produce identical proposals and decisions.
    pub fn process(
        &self,
        invoice: &Invoice,
        purchase_orders: &[PurchaseOrder],
    ) -> EngramResult<PipelineOutcome> {
        let store = self.store.as_ref();

        let (memories, recall_note) = self.recall.recall(store, invoice)?;
        let recall_entry = AuditEntry::new(
            &invoice.id,
            PipelineStep::Recall,
            &recall_note,
            memories.referenced_ids(),
        );
        store.append_audit(&recall_entry)?;

        let (normalized, proposals, apply_note) =
            self.apply
                .apply(self.extractor.as_ref(), invoice, &memories, purchase_orders);
        let apply_entry = AuditEntry::new(&invoice.id, PipelineStep::Apply, &apply_note, Vec::new());
        store.append_audit(&apply_entry)?;

        let decision =
            self.decide
                .decide(&normalized, &proposals, &memories, invoice.extraction_confidence);
        let decide_entry = AuditEntry::new(
            &invoice.id,
            PipelineStep::Decide,
            &format!(
                "decide: requires_review={} confidence={}",
                decision.requires_review, decision.confidence_score
            ),
            Vec::new(),
        );
        store.append_audit(&decide_entry)?;

        info!(
            invoice = %invoice.id,
            vendor = %invoice.vendor_name,
            requires_review = decision.requires_review,
            "document processed"
        );

        Ok(PipelineOutcome {
            invoice: normalized,
            proposals,
            decision,
            memory_updates: Vec::new(),
            audit_trail: vec![recall_entry, apply_entry, decide_entry],
        })
    }

    /// The learn path, invoked when a human decision arrives for a document.
    ///
    /// Callers must not absorb feedback for a document flagged as a
    /// duplicate; this is the single point where a document enters the
    /// processed ledger.
    pub fn absorb(
        &self,
        invoice: &Invoice,
        human: &HumanCorrection,
    ) -> EngramResult<(Vec<MemoryUpdate>, AuditEntry)> {
        let store = self.store.as_ref();

        let (updates, note) = self.learn.learn(store, invoice, human)?;
        let referenced = updates.iter().map(|update| update.memory_id.clone()).collect();
        let entry = AuditEntry::new(&invoice.id, PipelineStep::Learn, &note, referenced);
        store.append_audit(&entry)?;

        Ok((updates, entry))
    }

    /// The ordered audit trail recorded for a document so far.
    pub fn audit_trail(&self, invoice_id: &str) -> EngramResult<Vec<AuditEntry>> {
        self.store.audit_for_invoice(invoice_id)
    }
}
