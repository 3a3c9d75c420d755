use serde::{Deserialize, Serialize};
use std::fmt;

use super::target::{CorrectionTarget, DocumentField};
use crate::memory::Confidence;

/// One independent rule that forces human review regardless of the overall
/// confidence score. The `Display` text is the exact fragment the decision
/// reasoning embeds, so explanations are reconstructible from the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Escalation {
    PotentialDuplicate { invoice_number: String },
    InsufficientVendorHistory { vendor_name: String, prior_uses: u64 },
    LowConfidenceCorrection { target: CorrectionTarget, confidence: f64 },
    PendingCorrection { target: CorrectionTarget, confidence: f64 },
    ConflictingMemory { detail: String },
    UnresolvedRequiredField { field: DocumentField },
    BelowAutoCorrectThreshold { score: f64 },
}

impl fmt::Display for Escalation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PotentialDuplicate { invoice_number } => {
                write!(f, "potential duplicate of already-processed invoice {invoice_number}")
            }
            Self::InsufficientVendorHistory { vendor_name, prior_uses } => {
                write!(f, "vendor {vendor_name} has insufficient history ({prior_uses} prior uses)")
            }
            Self::LowConfidenceCorrection { target, confidence } => {
                write!(f, "correction for {target} has low confidence {confidence:.2}")
            }
            Self::PendingCorrection { target, confidence } => {
                write!(
                    f,
                    "pending correction for {target} at confidence {confidence:.2} needs explicit approval"
                )
            }
            Self::ConflictingMemory { detail } => {
                write!(f, "conflicting memory signals: {detail}")
            }
            Self::UnresolvedRequiredField { field } => {
                write!(f, "required field {field} remains unresolved")
            }
            Self::BelowAutoCorrectThreshold { score } => {
                write!(f, "overall confidence {score:.2} is below the auto-correct threshold")
            }
        }
    }
}

/// The outcome of the Decide stage. Total: every document gets one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub requires_review: bool,
    pub reasoning: String,
    pub confidence_score: Confidence,
    pub escalations: Vec<Escalation>,
}
