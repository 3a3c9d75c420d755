use serde::{Deserialize, Serialize};

use super::audit::AuditEntry;
use super::decision::Decision;
use super::proposal::ProposedCorrection;
use super::update::MemoryUpdate;
use crate::document::Invoice;
use crate::memory::Confidence;

/// Everything a document-processing caller gets back from the pipeline:
/// the normalized document, the proposals, the verdict, and the audit trail.
/// `memory_updates` stays empty until the document's feedback is absorbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub invoice: Invoice,
    pub proposals: Vec<ProposedCorrection>,
    pub decision: Decision,
    pub memory_updates: Vec<MemoryUpdate>,
    pub audit_trail: Vec<AuditEntry>,
}

impl PipelineOutcome {
    pub fn requires_review(&self) -> bool {
        self.decision.requires_review
    }

    pub fn confidence_score(&self) -> Confidence {
        self.decision.confidence_score
    }

    pub fn reasoning(&self) -> &str {
        &self.decision.reasoning
    }
}
