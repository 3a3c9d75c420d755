//! Lenient date handling. Vendor documents carry dates as `15.01.2024`,
//! `15-01-2024`, or `2024-01-15`; all three parse, everything else is `None`.

use chrono::NaiveDate;

/// Formats accepted, tried in order.
const FORMATS: [&str; 3] = ["%d.%m.%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse a date string in any accepted format.
pub fn parse_flexible(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Find the first parsable date anywhere in a block of text.
pub fn find_in_text(text: &str) -> Option<NaiveDate> {
    crate::patterns::DATE
        .as_ref()?
        .find_iter(text)
        .find_map(|m| parse_flexible(m.as_str()))
}

/// Render a date in ISO form.
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whole days between two lenient date strings, if both parse.
pub fn days_between(a: &str, b: &str) -> Option<i64> {
    let first = parse_flexible(a)?;
    let second = parse_flexible(b)?;
    Some((first - second).num_days().abs())
}
