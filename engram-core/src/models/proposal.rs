use serde::{Deserialize, Serialize};

use super::target::CorrectionTarget;
use crate::memory::Confidence;

/// One correction proposed by Apply, auto-applied when its confidence
/// clears the threshold, otherwise listed as pending approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedCorrection {
    pub target: CorrectionTarget,
    pub original_value: Option<String>,
    pub proposed_value: String,
    pub confidence: Confidence,
    pub reasoning: String,
    pub auto_applied: bool,
}

impl ProposedCorrection {
    /// Build a proposal; the auto-applied flag follows the confidence threshold.
    pub fn new(
        target: CorrectionTarget,
        original_value: Option<&str>,
        proposed_value: &str,
        confidence: Confidence,
        reasoning: &str,
    ) -> Self {
        Self {
            target,
            original_value: original_value.map(str::to_string),
            proposed_value: proposed_value.to_string(),
            confidence,
            reasoning: reasoning.to_string(),
            auto_applied: confidence.is_auto_apply(),
        }
    }

    /// A proposal that exists but is never written without approval,
    /// regardless of confidence.
    pub fn pending_only(
        target: CorrectionTarget,
        original_value: Option<&str>,
        proposed_value: &str,
        confidence: Confidence,
        reasoning: &str,
    ) -> Self {
        Self {
            auto_applied: false,
            ..Self::new(target, original_value, proposed_value, confidence, reasoning)
        }
    }
}
