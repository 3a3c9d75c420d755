//! Resolution memories: append-only records of human approve/reject decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Batch-level human verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Approved,
    Rejected,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => f.write_str("approved"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// One immutable record of a human decision on one field correction.
/// Used only in aggregate (counts and ratios) by Recall and Decide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionMemory {
    /// UUID v4 identifier.
    pub id: String,
    pub invoice_id: String,
    pub vendor_name: String,
    pub discrepancy_type: String,
    pub original_value: Option<String>,
    pub corrected_value: String,
    pub resolution: Resolution,
    pub human_feedback: String,
    pub created_at: DateTime<Utc>,
}

impl ResolutionMemory {
    pub fn new(
        invoice_id: &str,
        vendor_name: &str,
        discrepancy_type: &str,
        original_value: Option<&str>,
        corrected_value: &str,
        resolution: Resolution,
        human_feedback: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            vendor_name: vendor_name.to_string(),
            discrepancy_type: discrepancy_type.to_string(),
            original_value: original_value.map(str::to_string),
            corrected_value: corrected_value.to_string(),
            resolution,
            human_feedback: human_feedback.to_string(),
            created_at: Utc::now(),
        }
    }
}
