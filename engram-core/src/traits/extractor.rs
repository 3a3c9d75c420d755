/// The raw-text extraction boundary. Implementations are regex-level and
/// replaceable; the pipeline only relies on this contract.
///
/// Values come back normalized (ISO dates, upper-case currency codes);
/// the confidence attached to each extraction is owned by the Apply stage.
pub trait ITextExtractor: Send + Sync {
    /// Find a date anchored by `label` (e.g. "Leistungsdatum: 15.01.2024")
    /// and return it in ISO form (`2024-01-15`).
    fn labeled_date(&self, raw_text: &str, label: &str) -> Option<String>;

    /// Find a gross/total amount in the text.
    fn total_amount(&self, raw_text: &str) -> Option<f64>;

    /// Find an ISO 4217 currency code.
    fn currency_code(&self, raw_text: &str) -> Option<String>;

    /// Find discount/payment terms (e.g. "2% 10, net 30").
    fn discount_terms(&self, raw_text: &str) -> Option<String>;

    /// Whether the text indicates totals are VAT-inclusive.
    fn mentions_inclusive_tax(&self, raw_text: &str) -> bool;
}
