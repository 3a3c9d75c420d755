//! Per-vendor aggregate memory: field mappings, tax behavior, SKU mappings,
//! default currency, and payment terms, owned by one vendor record.
//!
//! The aggregate confidence is always recomputed from the sub-memories and
//! usage count; it is never written independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;
use crate::models::DocumentField;

/// Confidence boost applied to a tax behavior on an approved correction.
const REINFORCE_BOOST: f64 = 0.15;
/// Confidence penalty applied to a tax behavior on a rejected correction.
const WEAKEN_PENALTY: f64 = 0.3;

/// Learned mapping from a vendor-specific source label to a schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source_label: String,
    pub target_field: DocumentField,
    pub confidence: Confidence,
    pub success_count: u32,
    pub failure_count: u32,
}

impl FieldMapping {
    fn record(&mut self, approved: bool) {
        if approved {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.confidence = Confidence::from_outcomes(self.success_count, self.failure_count);
    }
}

/// Learned tax handling of a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBehavior {
    pub is_inclusive: bool,
    pub default_rate: f64,
    pub confidence: Confidence,
}

/// Learned mapping from a line-item description to a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuMapping {
    pub description: String,
    pub sku: String,
    pub confidence: Confidence,
    pub usage_count: u32,
}

impl SkuMapping {
    /// Case-insensitive substring containment in either direction.
    pub fn matches_description(&self, description: &str) -> bool {
        let known = self.description.to_lowercase();
        let probe = description.to_lowercase();
        if known.is_empty() || probe.is_empty() {
            return false;
        }
        known.contains(&probe) || probe.contains(&known)
    }
}

/// The owning aggregate of everything learned about one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorMemory {
    pub vendor_name: String,
    pub field_mappings: Vec<FieldMapping>,
    pub tax_behavior: Option<TaxBehavior>,
    pub default_currency: Option<String>,
    pub sku_mappings: Vec<SkuMapping>,
    pub payment_terms: Option<String>,
    /// Derived from the sub-memories; see [`VendorMemory::recompute_confidence`].
    pub confidence: Confidence,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VendorMemory {
    /// A fresh vendor record, created lazily on first correction.
    pub fn new(vendor_name: &str) -> Self {
        let now = Utc::now();
        Self {
            vendor_name: vendor_name.to_string(),
            field_mappings: Vec::new(),
            tax_behavior: None,
            default_currency: None,
            sku_mappings: Vec::new(),
            payment_terms: None,
            confidence: Confidence::default(),
            usage_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The mapping whose target is `field`, if one has been learned.
    pub fn mapping_for(&self, field: DocumentField) -> Option<&FieldMapping> {
        self.field_mappings.iter().find(|m| m.target_field == field)
    }

    /// The best SKU mapping for a line-item description, highest confidence first.
    pub fn sku_for_description(&self, description: &str) -> Option<&SkuMapping> {
        self.sku_mappings
            .iter()
            .filter(|m| m.matches_description(description))
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Reinforce or create the mapping (source label → target field).
    pub fn record_field_mapping(&mut self, source_label: &str, target: DocumentField, approved: bool) {
        match self
            .field_mappings
            .iter_mut()
            .find(|m| m.target_field == target && m.source_label == source_label)
        {
            Some(mapping) => mapping.record(approved),
            None => {
                let mut mapping = FieldMapping {
                    source_label: source_label.to_string(),
                    target_field: target,
                    confidence: Confidence::from_outcomes(0, 0),
                    success_count: 0,
                    failure_count: 0,
                };
                mapping.record(approved);
                self.field_mappings.push(mapping);
            }
        }
        self.touch();
    }

    /// Reinforce or create the vendor's tax behavior.
    pub fn record_tax_behavior(&mut self, is_inclusive: bool, default_rate: f64, approved: bool) {
        match &mut self.tax_behavior {
            Some(behavior) => {
                behavior.is_inclusive = is_inclusive;
                behavior.default_rate = default_rate;
                let value = if approved {
                    behavior.confidence.value() + REINFORCE_BOOST
                } else {
                    behavior.confidence.value() - WEAKEN_PENALTY
                };
                behavior.confidence =
                    Confidence::new(value.clamp(Confidence::FLOOR, Confidence::CORRECTION_CAP));
            }
            None => {
                self.tax_behavior = Some(TaxBehavior {
                    is_inclusive,
                    default_rate,
                    confidence: Confidence::default(),
                });
            }
        }
        self.touch();
    }

    /// Reinforce or create a SKU mapping keyed by the line-item description.
    pub fn record_sku_mapping(&mut self, description: &str, sku: &str) {
        match self
            .sku_mappings
            .iter_mut()
            .find(|m| m.description.eq_ignore_ascii_case(description) && m.sku == sku)
        {
            Some(mapping) => {
                mapping.usage_count += 1;
                mapping.confidence = Confidence::from_outcomes(mapping.usage_count, 0);
            }
            None => {
                self.sku_mappings.push(SkuMapping {
                    description: description.to_string(),
                    sku: sku.to_string(),
                    confidence: Confidence::from_outcomes(1, 0),
                    usage_count: 1,
                });
            }
        }
        self.touch();
    }

    /// Count one more use of this vendor's memory.
    pub fn record_use(&mut self) {
        self.usage_count += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.recompute_confidence();
    }

    /// Recompute the aggregate from sub-memory confidences and usage count.
    pub fn recompute_confidence(&mut self) {
        self.confidence = Confidence::vendor_aggregate(&self.sub_confidences(), self.usage_count);
    }

    fn sub_confidences(&self) -> Vec<f64> {
        let mut subs: Vec<f64> = self.field_mappings.iter().map(|m| m.confidence.value()).collect();
        if let Some(behavior) = &self.tax_behavior {
            subs.push(behavior.confidence.value());
        }
        subs.extend(self.sku_mappings.iter().map(|m| m.confidence.value()));
        subs
    }
}
