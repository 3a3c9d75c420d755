use serde::{Deserialize, Serialize};
use std::fmt;

/// Document-level fields of the fixed intake schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentField {
    InvoiceNumber,
    InvoiceDate,
    ServiceDate,
    Currency,
    PoNumber,
    NetTotal,
    TaxTotal,
    GrossTotal,
    TaxRate,
    DiscountTerms,
}

impl fmt::Display for DocumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvoiceNumber => "invoice_number",
            Self::InvoiceDate => "invoice_date",
            Self::ServiceDate => "service_date",
            Self::Currency => "currency",
            Self::PoNumber => "po_number",
            Self::NetTotal => "net_total",
            Self::TaxTotal => "tax_total",
            Self::GrossTotal => "gross_total",
            Self::TaxRate => "tax_rate",
            Self::DiscountTerms => "discount_terms",
        };
        f.write_str(name)
    }
}

/// Fields of a single line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemField {
    Sku,
    Description,
    Quantity,
    UnitPrice,
}

impl fmt::Display for LineItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sku => "sku",
            Self::Description => "description",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
        };
        f.write_str(name)
    }
}

/// What a correction addresses: a document field, or one field of one line item.
///
/// A tagged target instead of an encoded field-name string, so routing in
/// Apply and Learn never parses names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrectionTarget {
    Document { field: DocumentField },
    LineItem { index: usize, field: LineItemField },
}

impl CorrectionTarget {
    pub fn document(field: DocumentField) -> Self {
        Self::Document { field }
    }

    pub fn line_item(index: usize, field: LineItemField) -> Self {
        Self::LineItem { index, field }
    }

    /// True when this targets the given document-level field.
    pub fn is_document_field(&self, field: DocumentField) -> bool {
        matches!(self, Self::Document { field: f } if *f == field)
    }

    /// The line-item index, when this targets a line item.
    pub fn line_item_index(&self) -> Option<usize> {
        match self {
            Self::LineItem { index, .. } => Some(*index),
            Self::Document { .. } => None,
        }
    }
}

impl fmt::Display for CorrectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document { field } => write!(f, "{field}"),
            Self::LineItem { index, field } => write!(f, "line_items[{index}].{field}"),
        }
    }
}
