use serde::{Deserialize, Serialize};

/// Row counts and aggregate confidence across the knowledge store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub vendor_memories: usize,
    pub correction_memories: usize,
    pub resolution_memories: usize,
    pub processed_invoices: usize,
    pub average_vendor_confidence: f64,
}
