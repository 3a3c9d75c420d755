//! The update-rule table: explicit `(target predicate, rationale predicate)`
//! entries evaluated in a fixed order. The first matching entry picks the
//! update strategy; a correction matching no entry still gets the generic
//! reinforcement pass and a resolution record.

use engram_core::models::{CorrectionTarget, DocumentField, LineItemField};

/// Anchor label German vendors use for the service date.
pub const SERVICE_DATE_ANCHOR: &str = "Leistungsdatum";

/// What a matched rule does to vendor and correction memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Learn a source-label → field mapping and an extraction pattern.
    ExtractionMapping,
    /// Learn VAT-inclusive tax behavior.
    TaxRecalculation,
    /// Set the vendor default currency. Never weakened by rejection.
    CurrencyDefault,
    /// Learn a purchase-order match pattern from the human rationale.
    PoMatching,
    /// Learn a description → SKU mapping for one line item.
    SkuMapping,
    /// Set the vendor payment terms.
    PaymentTerms,
}

struct Rule {
    strategy: UpdateStrategy,
    target_matches: fn(&CorrectionTarget) -> bool,
    rationale_matches: fn(&str) -> bool,
}

fn any_rationale(_reason: &str) -> bool {
    true
}

fn mentions_anchor_label(reason: &str) -> bool {
    reason.to_lowercase().contains(&SERVICE_DATE_ANCHOR.to_lowercase())
}

fn mentions_tax(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    ["vat", "mwst", "tax"].iter().any(|needle| lower.contains(needle))
}

/// The table. Order matters: the first hit wins, so the entries that also
/// inspect the rationale come before the purely target-keyed ones.
const RULES: &[Rule] = &[
    Rule {
        strategy: UpdateStrategy::ExtractionMapping,
        target_matches: |target| target.is_document_field(DocumentField::ServiceDate),
        rationale_matches: mentions_anchor_label,
    },
    Rule {
        strategy: UpdateStrategy::TaxRecalculation,
        target_matches: |target| {
            target.is_document_field(DocumentField::TaxTotal)
                || target.is_document_field(DocumentField::GrossTotal)
        },
        rationale_matches: mentions_tax,
    },
    Rule {
        strategy: UpdateStrategy::CurrencyDefault,
        target_matches: |target| target.is_document_field(DocumentField::Currency),
        rationale_matches: any_rationale,
    },
    Rule {
        strategy: UpdateStrategy::PoMatching,
        target_matches: |target| target.is_document_field(DocumentField::PoNumber),
        rationale_matches: any_rationale,
    },
    Rule {
        strategy: UpdateStrategy::SkuMapping,
        target_matches: |target| {
            matches!(target, CorrectionTarget::LineItem { field: LineItemField::Sku, .. })
        },
        rationale_matches: any_rationale,
    },
    Rule {
        strategy: UpdateStrategy::PaymentTerms,
        target_matches: |target| target.is_document_field(DocumentField::DiscountTerms),
        rationale_matches: any_rationale,
    },
];

/// The strategy for one field correction, if any entry matches.
pub fn match_rule(target: &CorrectionTarget, reason: &str) -> Option<UpdateStrategy> {
    RULES
        .iter()
        .find(|rule| (rule.target_matches)(target) && (rule.rationale_matches)(reason))
        .map(|rule| rule.strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_date_needs_the_anchor_rationale() {
        let target = CorrectionTarget::document(DocumentField::ServiceDate);
        assert_eq!(
            match_rule(&target, "extracted via Leistungsdatum label"),
            Some(UpdateStrategy::ExtractionMapping)
        );
        assert_eq!(match_rule(&target, "guessed from the header"), None);
    }

    #[test]
    fn tax_fields_need_a_tax_rationale() {
        let target = CorrectionTarget::document(DocumentField::GrossTotal);
        assert_eq!(
            match_rule(&target, "totals were VAT-inclusive"),
            Some(UpdateStrategy::TaxRecalculation)
        );
        assert_eq!(match_rule(&target, "typo in the amount"), None);
    }

    #[test]
    fn target_keyed_rules_ignore_the_rationale() {
        assert_eq!(
            match_rule(&CorrectionTarget::document(DocumentField::Currency), "whatever"),
            Some(UpdateStrategy::CurrencyDefault)
        );
        assert_eq!(
            match_rule(&CorrectionTarget::document(DocumentField::PoNumber), ""),
            Some(UpdateStrategy::PoMatching)
        );
        assert_eq!(
            match_rule(&CorrectionTarget::line_item(0, LineItemField::Sku), ""),
            Some(UpdateStrategy::SkuMapping)
        );
        assert_eq!(
            match_rule(&CorrectionTarget::document(DocumentField::DiscountTerms), ""),
            Some(UpdateStrategy::PaymentTerms)
        );
    }

    #[test]
    fn unrouted_targets_match_nothing() {
        assert_eq!(
            match_rule(&CorrectionTarget::document(DocumentField::InvoiceNumber), "fixed"),
            None
        );
        assert_eq!(
            match_rule(&CorrectionTarget::line_item(1, LineItemField::Quantity), "recounted"),
            None
        );
    }
}
