/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Confidence a fresh vendor memory starts with before any evidence accrues.
pub const DEFAULT_VENDOR_CONFIDENCE: f64 = 0.5;

/// Multiplicative confidence decay applied per day since last use.
pub const DAILY_DECAY_RATE: f64 = 0.99;

/// Calendar-day window within which two same-numbered invoices count as duplicates.
pub const DUPLICATE_WINDOW_DAYS: i64 = 7;

/// Relative gross-total tolerance for duplicate detection.
pub const DUPLICATE_AMOUNT_TOLERANCE: f64 = 0.01;

/// Rejection rate at or above which vendor memory signals are considered conflicting.
pub const REJECTION_RATE_TRIGGER: f64 = 0.4;

/// Minimum resolution records before the rejection rate is meaningful.
pub const MIN_RESOLUTIONS_FOR_RATE: usize = 3;

/// Vendors with fewer prior uses than this always escalate to review.
pub const MIN_VENDOR_USES: u64 = 2;

/// Sentinel SKU written into normalized line items that carry none.
pub const UNKNOWN_SKU: &str = "UNKNOWN";

/// Confidence of a currency proposal sourced from vendor memory.
pub const VENDOR_CURRENCY_CONFIDENCE: f64 = 0.75;

/// Confidence of a currency proposal sourced from free text.
pub const TEXT_CURRENCY_CONFIDENCE: f64 = 0.70;

/// Confidence of a discount-terms proposal sourced from free text.
pub const TEXT_TERMS_CONFIDENCE: f64 = 0.8;

/// Confidence of the lone-candidate purchase-order fallback proposal.
pub const SINGLE_PO_FALLBACK_CONFIDENCE: f64 = 0.6;
