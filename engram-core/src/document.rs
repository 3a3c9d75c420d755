//! Document intake contract: parsed invoices, line items, purchase orders.
//!
//! Documents arrive already extracted into this fixed schema; dates are kept
//! as the vendor-format strings they were extracted as and parsed leniently
//! where a stage needs a calendar value.

use serde::{Deserialize, Serialize};

/// One parsed document as handed over by the extraction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub vendor_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub service_date: Option<String>,
    pub currency: Option<String>,
    pub po_number: Option<String>,
    pub net_total: f64,
    pub tax_total: f64,
    pub gross_total: f64,
    pub tax_rate: f64,
    pub line_items: Vec<LineItem>,
    pub discount_terms: Option<String>,
    /// Upstream extraction confidence, the base for the overall score.
    pub extraction_confidence: f64,
    /// Free-text body the raw-text extractors run over.
    pub raw_text: String,
}

impl Invoice {
    /// True when the line item at `index` has no usable SKU.
    pub fn line_item_needs_sku(&self, index: usize) -> bool {
        self.line_items
            .get(index)
            .map(|item| item.sku_is_missing())
            .unwrap_or(false)
    }

    /// SKUs of all line items that carry one.
    pub fn known_skus(&self) -> Vec<&str> {
        self.line_items
            .iter()
            .filter_map(|item| item.sku.as_deref())
            .filter(|sku| !sku.is_empty() && *sku != crate::constants::UNKNOWN_SKU)
            .collect()
    }
}

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub sku: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    /// Whether the SKU is absent, empty, or the sentinel.
    pub fn sku_is_missing(&self) -> bool {
        match self.sku.as_deref() {
            None | Some("") => true,
            Some(sku) => sku == crate::constants::UNKNOWN_SKU,
        }
    }
}

/// A purchase order candidate supplied by the caller for PO matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_number: String,
    pub vendor_name: String,
    pub skus: Vec<String>,
}
