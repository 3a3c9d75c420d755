use serde::{Deserialize, Serialize};

use super::target::CorrectionTarget;
use crate::memory::Resolution;

/// One field-level correction inside a human decision batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCorrection {
    pub target: CorrectionTarget,
    pub from: Option<String>,
    pub to: String,
    /// Free-text rationale; update rules match against it.
    pub reason: String,
}

/// The human correction intake contract. Approval is batch-level; individual
/// field corrections carry no verdict of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanCorrection {
    pub document_id: String,
    pub vendor_name: String,
    pub corrections: Vec<FieldCorrection>,
    pub final_decision: Resolution,
}

impl HumanCorrection {
    pub fn is_approved(&self) -> bool {
        self.final_decision == Resolution::Approved
    }
}
