//! Compiled-once regex tables for the raw-text extractors.
//!
//! Each pattern compiles lazily into an `Option<Regex>`; a pattern that
//! fails to compile simply never matches.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// A date in any of the accepted literal formats.
pattern!(
    DATE,
    r"\b(?:\d{1,2}\.\d{1,2}\.\d{4}|\d{1,2}-\d{1,2}-\d{4}|\d{4}-\d{1,2}-\d{1,2})\b"
);

// A total/gross amount anchored by a nearby keyword.
pattern!(
    TOTAL_AMOUNT,
    r"(?i)\b(?:gesamtbetrag|gesamt|bruttobetrag|brutto|total(?:\s+due)?|amount\s+due|summe)\b[^\d-]{0,24}(\d[\d.,]*)"
);

// An ISO 4217 currency code.
pattern!(CURRENCY_CODE, r"\b(EUR|USD|GBP|CHF|JPY|SEK|NOK|DKK|PLN|CZK)\b");

// Early-payment discount terms, e.g. "2% 10, net 30".
pattern!(
    DISCOUNT_TERMS,
    r"(?i)\b(\d+(?:[.,]\d+)?)\s*%\s*(?:discount\s+)?(\d+)\s*(?:days?)?\s*,?\s*net(?:to)?\s*(\d+)\b"
);

// German skonto phrasing, e.g. "2% Skonto innerhalb 10 Tagen".
pattern!(
    SKONTO_TERMS,
    r"(?i)\b(\d+(?:[.,]\d+)?)\s*%\s*skonto\b[^\d]{0,24}(\d+)\s*tag"
);

// Indicators that quoted totals already include VAT.
pattern!(
    INCLUSIVE_TAX,
    r"(?i)\b(?:inkl\.?\s*mwst|mwst\.?\s*(?:enthalten|inklusive)|preise?\s+inkl|including\s+vat|inclusive\s+of\s+vat|incl\.?\s*vat|vat\s+included)\b"
);
