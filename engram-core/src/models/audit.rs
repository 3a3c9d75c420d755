use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage an audit entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Recall,
    Apply,
    Decide,
    Learn,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recall => f.write_str("recall"),
            Self::Apply => f.write_str("apply"),
            Self::Decide => f.write_str("decide"),
            Self::Learn => f.write_str("learn"),
        }
    }
}

/// One audit-log record, keyed by document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub invoice_id: String,
    pub step: PipelineStep,
    pub detail: String,
    pub referenced_memory_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(invoice_id: &str, step: PipelineStep, detail: &str, referenced_memory_ids: Vec<String>) -> Self {
        Self {
            invoice_id: invoice_id.to_string(),
            step,
            detail: detail.to_string(),
            referenced_memory_ids,
            created_at: Utc::now(),
        }
    }
}
