//! The transient per-document working set assembled by Recall and consumed
//! by Apply and Decide. Never persisted.

use super::correction::CorrectionMemory;
use super::resolution::{Resolution, ResolutionMemory};
use super::vendor::VendorMemory;
use crate::constants::{MIN_RESOLUTIONS_FOR_RATE, MIN_VENDOR_USES};
use crate::models::ProcessedInvoice;

#[derive(Debug, Clone, Default)]
pub struct RecalledMemories {
    pub vendor_memory: Option<VendorMemory>,
    /// Ordered by descending (decayed) confidence.
    pub correction_memories: Vec<CorrectionMemory>,
    /// Ordered most-recent-first.
    pub resolution_memories: Vec<ResolutionMemory>,
    pub potential_duplicate: Option<ProcessedInvoice>,
}

impl RecalledMemories {
    /// A vendor with no memory, or one seen fewer than the minimum prior uses.
    pub fn is_new_vendor(&self) -> bool {
        match &self.vendor_memory {
            None => true,
            Some(vendor) => vendor.usage_count < MIN_VENDOR_USES,
        }
    }

    /// Rejection ratio across the vendor's resolution records.
    /// `None` until enough records exist for the ratio to be meaningful.
    pub fn rejection_rate(&self) -> Option<f64> {
        if self.resolution_memories.len() < MIN_RESOLUTIONS_FOR_RATE {
            return None;
        }
        let rejected = self
            .resolution_memories
            .iter()
            .filter(|r| r.resolution == Resolution::Rejected)
            .count();
        Some(rejected as f64 / self.resolution_memories.len() as f64)
    }

    /// Correction memories whose failures outnumber their successes.
    pub fn conflicted_corrections(&self) -> Vec<&CorrectionMemory> {
        self.correction_memories.iter().filter(|m| m.is_conflicted()).collect()
    }

    /// Memory ids this snapshot references, for the audit trail.
    pub fn referenced_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        if let Some(vendor) = &self.vendor_memory {
            ids.push(format!("vendor:{}", vendor.vendor_name));
        }
        ids.extend(self.correction_memories.iter().map(|m| m.id.clone()));
        ids.extend(self.resolution_memories.iter().map(|m| m.id.clone()));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_vendor_is_new() {
        let recalled = RecalledMemories::default();
        assert!(recalled.is_new_vendor());
    }

    #[test]
    fn low_usage_vendor_is_new() {
        let mut vendor = VendorMemory::new("Supplier GmbH");
        vendor.record_use();
        let recalled = RecalledMemories {
            vendor_memory: Some(vendor),
            ..Default::default()
        };
        assert!(recalled.is_new_vendor());
    }

    #[test]
    fn rejection_rate_needs_enough_records() {
        let mut recalled = RecalledMemories::default();
        for i in 0..2 {
            recalled.resolution_memories.push(ResolutionMemory::new(
                &format!("inv-{i}"),
                "Supplier GmbH",
                "currency",
                None,
                "EUR",
                Resolution::Rejected,
                "",
            ));
        }
        assert_eq!(recalled.rejection_rate(), None);
        recalled.resolution_memories.push(ResolutionMemory::new(
            "inv-2",
            "Supplier GmbH",
            "currency",
            None,
            "EUR",
            Resolution::Approved,
            "",
        ));
        let rate = recalled.rejection_rate().unwrap();
        assert!((rate - 2.0 / 3.0).abs() < 1e-9);
    }
}
