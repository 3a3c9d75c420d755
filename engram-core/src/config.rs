//! Tunable thresholds, loadable from TOML. Defaults match `constants`.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{EngramError, EngramResult};
use crate::memory::Confidence;

/// Engine configuration threaded through the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    /// Proposals at or above this are written into the normalized document.
    pub auto_apply_threshold: f64,
    /// Overall scores below this force human review.
    pub auto_correct_threshold: f64,
    /// Proposals below this always escalate.
    pub escalation_floor: f64,
    /// Multiplicative confidence decay per day since last use.
    pub daily_decay_rate: f64,
    /// Calendar-day window for duplicate detection.
    pub duplicate_window_days: i64,
    /// Relative gross-total tolerance for duplicate detection.
    pub duplicate_amount_tolerance: f64,
    /// Rejection rate at which vendor signals count as conflicting.
    pub rejection_rate_trigger: f64,
    /// Minimum resolution records before the rejection rate applies.
    pub min_resolutions_for_rate: usize,
    /// Vendors with fewer prior uses always escalate.
    pub min_vendor_uses: u64,
}

impl Default for EngramConfig {
    fn default() -> Self {
        Self {
            auto_apply_threshold: Confidence::AUTO_APPLY,
            auto_correct_threshold: Confidence::AUTO_CORRECT,
            escalation_floor: Confidence::ESCALATION_FLOOR,
            daily_decay_rate: constants::DAILY_DECAY_RATE,
            duplicate_window_days: constants::DUPLICATE_WINDOW_DAYS,
            duplicate_amount_tolerance: constants::DUPLICATE_AMOUNT_TOLERANCE,
            rejection_rate_trigger: constants::REJECTION_RATE_TRIGGER,
            min_resolutions_for_rate: constants::MIN_RESOLUTIONS_FOR_RATE,
            min_vendor_uses: constants::MIN_VENDOR_USES,
        }
    }
}

impl EngramConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(raw: &str) -> EngramResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| EngramError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold combinations the pipeline cannot operate under.
    pub fn validate(&self) -> EngramResult<()> {
        let unit = |name: &str, value: f64| -> EngramResult<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngramError::Config(format!("{name} must be within [0, 1], got {value}")));
            }
            Ok(())
        };
        unit("auto_apply_threshold", self.auto_apply_threshold)?;
        unit("auto_correct_threshold", self.auto_correct_threshold)?;
        unit("escalation_floor", self.escalation_floor)?;
        unit("daily_decay_rate", self.daily_decay_rate)?;
        unit("duplicate_amount_tolerance", self.duplicate_amount_tolerance)?;
        unit("rejection_rate_trigger", self.rejection_rate_trigger)?;
        if self.auto_correct_threshold > self.auto_apply_threshold {
            return Err(EngramError::Config(
                "auto_correct_threshold must not exceed auto_apply_threshold".to_string(),
            ));
        }
        if self.duplicate_window_days < 0 {
            return Err(EngramError::Config(
                "duplicate_window_days must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngramConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_partial_toml() {
        let config = EngramConfig::from_toml_str("auto_apply_threshold = 0.9\n").unwrap();
        assert_eq!(config.auto_apply_threshold, 0.9);
        assert_eq!(config.auto_correct_threshold, Confidence::AUTO_CORRECT);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let raw = "auto_apply_threshold = 0.5\nauto_correct_threshold = 0.7\n";
        assert!(EngramConfig::from_toml_str(raw).is_err());
    }

    #[test]
    fn rejects_out_of_range_decay() {
        let raw = "daily_decay_rate = 1.5\n";
        assert!(EngramConfig::from_toml_str(raw).is_err());
    }
}
