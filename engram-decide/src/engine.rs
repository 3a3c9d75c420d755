//! DecideEngine: fold the escalation rules and the overall score into one
//! definite verdict with reconstructible reasoning.

use tracing::debug;

use engram_core::config::EngramConfig;
use engram_core::document::Invoice;
use engram_core::memory::RecalledMemories;
use engram_core::models::{Decision, Escalation, ProposedCorrection};

use crate::rules;
use crate::score;

pub struct DecideEngine {
    config: EngramConfig,
}

impl DecideEngine {
    pub fn new(config: EngramConfig) -> Self {
        Self { config }
    }

    /// Decide whether the normalized document is trustworthy enough to pass
    /// without review. Never fails; the worst case is an escalation.
    pub fn decide(
        &self,
        normalized: &Invoice,
        proposals: &[ProposedCorrection],
        memories: &RecalledMemories,
        base_confidence: f64,
    ) -> Decision {
        let prior_uses = memories
            .vendor_memory
            .as_ref()
            .map(|vendor| vendor.usage_count)
            .unwrap_or(0);
        let is_new_vendor = prior_uses < self.config.min_vendor_uses;

        let mut escalations = rules::evaluate(normalized, proposals, memories, &self.config);
        let confidence_score =
            score::overall_confidence(base_confidence, proposals, memories, is_new_vendor);

        // Only when no independent rule fired does the threshold decide.
        if escalations.is_empty() && confidence_score.value() < self.config.auto_correct_threshold {
            escalations.push(Escalation::BelowAutoCorrectThreshold {
                score: confidence_score.value(),
            });
        }

        let requires_review = !escalations.is_empty();
        let reasoning =
            build_reasoning(proposals, memories, &escalations, confidence_score.value(), requires_review);

        debug!(
            vendor = %normalized.vendor_name,
            requires_review,
            score = confidence_score.value(),
            escalations = escalations.len(),
            "decision made"
        );

        Decision {
            requires_review,
            reasoning,
            confidence_score,
            escalations,
        }
    }
}

/// Assemble the reasoning text from the structured parts, one line each, so
/// the explanation can be rebuilt from the fields alone.
fn build_reasoning(
    proposals: &[ProposedCorrection],
    memories: &RecalledMemories,
    escalations: &[Escalation],
    score: f64,
    requires_review: bool,
) -> String {
    let mut lines = Vec::new();

    let verdict = if requires_review {
        "requires human review"
    } else if score >= 0.85 {
        "auto-accept"
    } else {
        "auto-correct with flag"
    };
    lines.push(format!("verdict: {verdict} (overall confidence {score:.2})"));

    match &memories.vendor_memory {
        Some(vendor) => lines.push(format!(
            "vendor memory: {} prior uses, aggregate confidence {}",
            vendor.usage_count, vendor.confidence
        )),
        None => lines.push("vendor memory: none".to_string()),
    }

    for proposal in proposals.iter().filter(|p| p.auto_applied) {
        lines.push(format!(
            "auto-applied {}: {} (confidence {})",
            proposal.target, proposal.reasoning, proposal.confidence
        ));
    }

    for proposal in proposals.iter().filter(|p| !p.auto_applied) {
        lines.push(format!(
            "pending {}: {} -> {} (confidence {})",
            proposal.target,
            proposal.original_value.as_deref().unwrap_or("none"),
            proposal.proposed_value,
            proposal.confidence
        ));
    }

    for escalation in escalations {
        lines.push(format!("escalation: {escalation}"));
    }

    if let Some(duplicate) = &memories.potential_duplicate {
        lines.push(format!(
            "warning: likely duplicate of invoice {} dated {} (gross {:.2})",
            duplicate.invoice_number, duplicate.invoice_date, duplicate.gross_total
        ));
    }

    lines.join("\n")
}
