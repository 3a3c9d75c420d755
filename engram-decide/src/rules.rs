//! The independent escalation rules, evaluated in a fixed order.
//! Any single hit forces review; the rules never veto each other.

use engram_core::config::EngramConfig;
use engram_core::document::Invoice;
use engram_core::memory::RecalledMemories;
use engram_core::models::{DocumentField, Escalation, ProposedCorrection};

pub fn evaluate(
    normalized: &Invoice,
    proposals: &[ProposedCorrection],
    memories: &RecalledMemories,
    config: &EngramConfig,
) -> Vec<Escalation> {
    let mut escalations = Vec::new();

    // 1. A potential duplicate was recalled.
    if let Some(duplicate) = &memories.potential_duplicate {
        escalations.push(Escalation::PotentialDuplicate {
            invoice_number: duplicate.invoice_number.clone(),
        });
    }

    // 2. New or low-history vendor.
    let prior_uses = memories
        .vendor_memory
        .as_ref()
        .map(|vendor| vendor.usage_count)
        .unwrap_or(0);
    if prior_uses < config.min_vendor_uses {
        escalations.push(Escalation::InsufficientVendorHistory {
            vendor_name: normalized.vendor_name.clone(),
            prior_uses,
        });
    }

    // 3. Any proposal below the escalation floor.
    for proposal in proposals {
        if proposal.confidence.value() < config.escalation_floor {
            escalations.push(Escalation::LowConfidenceCorrection {
                target: proposal.target,
                confidence: proposal.confidence.value(),
            });
        }
    }

    // 4. Any pending proposal at or above the floor needs explicit approval.
    for proposal in proposals {
        if !proposal.auto_applied && proposal.confidence.value() >= config.escalation_floor {
            escalations.push(Escalation::PendingCorrection {
                target: proposal.target,
                confidence: proposal.confidence.value(),
            });
        }
    }

    // 5. Conflicting memory signals.
    if let Some(rate) = memories.rejection_rate() {
        if rate >= config.rejection_rate_trigger {
            escalations.push(Escalation::ConflictingMemory {
                detail: format!(
                    "rejection rate {:.0}% across {} resolution records",
                    rate * 100.0,
                    memories.resolution_memories.len()
                ),
            });
        }
    }
    for memory in memories.conflicted_corrections() {
        escalations.push(Escalation::ConflictingMemory {
            detail: format!(
                "learned pattern '{}' for {} has failed more often than it succeeded",
                memory.pattern, memory.target
            ),
        });
    }

    // 6. Required fields still unresolved after Apply.
    let currency_missing = normalized
        .currency
        .as_deref()
        .map_or(true, |c| c.trim().is_empty());
    let currency_proposed = proposals
        .iter()
        .any(|p| p.target.is_document_field(DocumentField::Currency));
    if currency_missing && !currency_proposed {
        escalations.push(Escalation::UnresolvedRequiredField {
            field: DocumentField::Currency,
        });
    }

    escalations
}
