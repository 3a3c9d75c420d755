//! SKU recovery: match line-item descriptions against learned SKU mappings.

use engram_core::document::Invoice;
use engram_core::memory::RecalledMemories;
use engram_core::models::{CorrectionTarget, LineItemField, ProposedCorrection};

pub fn propose(invoice: &Invoice, memories: &RecalledMemories) -> Vec<ProposedCorrection> {
    let Some(vendor) = &memories.vendor_memory else {
        return Vec::new();
    };

    invoice
        .line_items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.sku_is_missing())
        .filter_map(|(index, item)| {
            let mapping = vendor.sku_for_description(&item.description)?;
            Some(ProposedCorrection::new(
                CorrectionTarget::line_item(index, LineItemField::Sku),
                item.sku.as_deref(),
                &mapping.sku,
                mapping.confidence,
                &format!(
                    "description '{}' matches learned mapping to SKU {}",
                    item.description, mapping.sku
                ),
            ))
        })
        .collect()
}
