//! Default `ITextExtractor` backed by the compiled pattern tables.

use engram_core::traits::ITextExtractor;
use regex::Regex;

use crate::date;
use crate::patterns;

/// Regex-level extractor. Stateless; one instance serves the whole pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexExtractor;

impl RegexExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ITextExtractor for RegexExtractor {
    fn labeled_date(&self, raw_text: &str, label: &str) -> Option<String> {
        if label.is_empty() {
            return None;
        }
        let anchor = Regex::new(&format!("(?i){}", regex::escape(label))).ok()?;
        let found = anchor.find(raw_text)?;

        // Only look just past the anchor, not the whole document.
        let tail = &raw_text[found.end()..];
        let limit = tail.char_indices().nth(80).map(|(i, _)| i).unwrap_or(tail.len());
        let window = &tail[..limit];

        patterns::DATE
            .as_ref()?
            .find(window)
            .and_then(|m| date::parse_flexible(m.as_str()))
            .map(date::to_iso)
    }

    fn total_amount(&self, raw_text: &str) -> Option<f64> {
        let captures = patterns::TOTAL_AMOUNT.as_ref()?.captures(raw_text)?;
        parse_amount(captures.get(1)?.as_str())
    }

    fn currency_code(&self, raw_text: &str) -> Option<String> {
        if let Some(m) = patterns::CURRENCY_CODE.as_ref().and_then(|re| re.find(raw_text)) {
            return Some(m.as_str().to_string());
        }
        // Symbol fallback for documents that never spell the code out.
        if raw_text.contains('€') {
            Some("EUR".to_string())
        } else if raw_text.contains('£') {
            Some("GBP".to_string())
        } else if raw_text.contains('$') {
            Some("USD".to_string())
        } else {
            None
        }
    }

    fn discount_terms(&self, raw_text: &str) -> Option<String> {
        if let Some(captures) = patterns::DISCOUNT_TERMS.as_ref().and_then(|re| re.captures(raw_text)) {
            let percent = captures.get(1)?.as_str().replace(',', ".");
            let days = captures.get(2)?.as_str();
            let net = captures.get(3)?.as_str();
            return Some(format!("{percent}% {days}, net {net}"));
        }
        patterns::SKONTO_TERMS
            .as_ref()
            .and_then(|re| re.find(raw_text))
            .map(|m| m.as_str().trim().to_string())
    }

    fn mentions_inclusive_tax(&self, raw_text: &str) -> bool {
        patterns::INCLUSIVE_TAX
            .as_ref()
            .is_some_and(|re| re.is_match(raw_text))
    }
}

/// Parse an amount that may use either decimal convention
/// (`1.190,00`, `1,190.00`, `1190.00`, `1190`).
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .to_string();
    if cleaned.is_empty() {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            // The rightmost separator is the decimal point.
            if dot > comma {
                cleaned.replace(',', "")
            } else {
                cleaned.replace('.', "").replace(',', ".")
            }
        }
        (None, Some(comma)) => {
            let decimals = cleaned.len() - comma - 1;
            if decimals <= 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (Some(dot), None) => {
            let decimals = cleaned.len() - dot - 1;
            // A lone dot followed by exactly three digits is a thousands separator.
            if decimals == 3 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    normalized.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_date_extracts_near_the_anchor() {
        let extractor = RegexExtractor::new();
        let text = "Rechnung R-1001\nLeistungsdatum: 15.01.2024\nBetrag: 1.190,00 EUR";
        assert_eq!(
            extractor.labeled_date(text, "Leistungsdatum"),
            Some("2024-01-15".to_string())
        );
        assert_eq!(extractor.labeled_date(text, "Lieferdatum"), None);
    }

    #[test]
    fn labeled_date_ignores_dates_far_from_the_anchor() {
        let extractor = RegexExtractor::new();
        let filler = "x".repeat(200);
        let text = format!("Leistungsdatum: siehe unten {filler} 15.01.2024");
        assert_eq!(extractor.labeled_date(&text, "Leistungsdatum"), None);
    }

    #[test]
    fn total_amount_handles_both_decimal_conventions() {
        let extractor = RegexExtractor::new();
        assert_eq!(extractor.total_amount("Gesamtbetrag: 1.190,00 EUR"), Some(1190.0));
        assert_eq!(extractor.total_amount("Total due: 1,190.00 USD"), Some(1190.0));
        assert_eq!(extractor.total_amount("Summe 950"), Some(950.0));
        assert_eq!(extractor.total_amount("no amounts here"), None);
    }

    #[test]
    fn currency_prefers_explicit_codes_over_symbols() {
        let extractor = RegexExtractor::new();
        assert_eq!(extractor.currency_code("Betrag in EUR"), Some("EUR".to_string()));
        assert_eq!(extractor.currency_code("Betrag: 100 €"), Some("EUR".to_string()));
        assert_eq!(extractor.currency_code("keine Angabe"), None);
    }

    #[test]
    fn discount_terms_normalize() {
        let extractor = RegexExtractor::new();
        assert_eq!(
            extractor.discount_terms("Payment terms: 2% 10, net 30"),
            Some("2% 10, net 30".to_string())
        );
        assert_eq!(
            extractor.discount_terms("2% discount 10 days net 30"),
            Some("2% 10, net 30".to_string())
        );
        assert!(extractor
            .discount_terms("3% Skonto innerhalb 10 Tagen")
            .is_some());
        assert_eq!(extractor.discount_terms("pay whenever"), None);
    }

    #[test]
    fn inclusive_tax_indicators() {
        let extractor = RegexExtractor::new();
        assert!(extractor.mentions_inclusive_tax("Alle Preise inkl. MwSt."));
        assert!(extractor.mentions_inclusive_tax("Total including VAT"));
        assert!(!extractor.mentions_inclusive_tax("zzgl. MwSt."));
    }

    #[test]
    fn amount_parsing_edge_cases() {
        assert_eq!(parse_amount("1.190"), Some(1190.0));
        assert_eq!(parse_amount("1.19"), Some(1.19));
        assert_eq!(parse_amount("1,190"), Some(1190.0));
        assert_eq!(parse_amount("1190,50"), Some(1190.5));
        assert_eq!(parse_amount(""), None);
    }
}
