use serde::{Deserialize, Serialize};
use std::fmt;

/// Which store a Learn mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryUpdateKind {
    Vendor,
    Correction,
    Resolution,
    Ledger,
}

impl fmt::Display for MemoryUpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor => f.write_str("vendor"),
            Self::Correction => f.write_str("correction"),
            Self::Resolution => f.write_str("resolution"),
            Self::Ledger => f.write_str("ledger"),
        }
    }
}

/// One mutation performed by Learn, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUpdate {
    pub kind: MemoryUpdateKind,
    pub memory_id: String,
    pub detail: String,
}

impl MemoryUpdate {
    pub fn new(kind: MemoryUpdateKind, memory_id: &str, detail: &str) -> Self {
        Self {
            kind,
            memory_id: memory_id.to_string(),
            detail: detail.to_string(),
        }
    }
}
