//! RecallEngine: fetch everything known about a document's vendor and probe
//! the duplicate guard. No side effects on the knowledge store.

use chrono::Utc;
use tracing::debug;

use engram_core::config::EngramConfig;
use engram_core::document::Invoice;
use engram_core::errors::EngramResult;
use engram_core::memory::RecalledMemories;
use engram_core::traits::IKnowledgeStore;
use engram_dedup::DuplicateGuard;

use crate::decay;

pub struct RecallEngine {
    config: EngramConfig,
    guard: DuplicateGuard,
}

impl RecallEngine {
    pub fn new(config: EngramConfig) -> Self {
        let guard = DuplicateGuard::new(&config);
        Self { config, guard }
    }

    /// Assemble the transient working set for one document.
    ///
    /// Confidences in the snapshot are attenuated by elapsed time since last
    /// use; the stored values remain untouched. Returns the snapshot plus a
    /// human-readable audit note.
    pub fn recall(
        &self,
        store: &dyn IKnowledgeStore,
        invoice: &Invoice,
    ) -> EngramResult<(RecalledMemories, String)> {
        let now = Utc::now();

        let mut vendor_memory = store.get_vendor(&invoice.vendor_name)?;
        if let Some(vendor) = &mut vendor_memory {
            let days = decay::days_since(vendor.updated_at, now);
            vendor.confidence =
                decay::decayed_confidence(vendor.confidence, days, self.config.daily_decay_rate);
        }

        let mut correction_memories = store.corrections_for_vendor(&invoice.vendor_name)?;
        for memory in &mut correction_memories {
            let days = decay::days_since(memory.updated_at, now);
            memory.confidence =
                decay::decayed_confidence(memory.confidence, days, self.config.daily_decay_rate);
        }
        // Re-rank by the decayed values; older high scores may fall behind
        // fresher medium ones.
        correction_memories.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let resolution_memories = store.resolutions_for_vendor(&invoice.vendor_name)?;
        let potential_duplicate = self.guard.check(store, invoice)?;

        debug!(
            vendor = %invoice.vendor_name,
            corrections = correction_memories.len(),
            resolutions = resolution_memories.len(),
            duplicate = potential_duplicate.is_some(),
            "recalled memories"
        );

        let note = format!(
            "recall: vendor memory {}; {} correction memories; {} resolution records; duplicate: {}",
            match &vendor_memory {
                Some(vendor) => format!(
                    "found (usage {}, confidence {})",
                    vendor.usage_count, vendor.confidence
                ),
                None => "absent".to_string(),
            },
            correction_memories.len(),
            resolution_memories.len(),
            match &potential_duplicate {
                Some(entry) => format!("{} ({})", entry.invoice_number, entry.invoice_date),
                None => "none".to_string(),
            },
        );

        Ok((
            RecalledMemories {
                vendor_memory,
                correction_memories,
                resolution_memories,
                potential_duplicate,
            },
            note,
        ))
    }
}
