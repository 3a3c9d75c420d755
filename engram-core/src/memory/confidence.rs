use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::constants::DEFAULT_VENDOR_CONFIDENCE;

/// Confidence score clamped to [0.0, 1.0].
/// Represents how much the engine trusts a learned pattern or a proposal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Proposals at or above this are written straight into the normalized document.
    pub const AUTO_APPLY: f64 = 0.85;
    /// Overall scores below this force human review.
    pub const AUTO_CORRECT: f64 = 0.60;
    /// Proposals below this always escalate, regardless of the overall score.
    pub const ESCALATION_FLOOR: f64 = 0.40;
    /// Lower bound every derived confidence is floored at.
    pub const FLOOR: f64 = 0.1;
    /// Upper bound for count-derived correction-memory confidence.
    pub const CORRECTION_CAP: f64 = 0.95;

    /// Create a new Confidence, clamping to [0.0, 1.0].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether a proposal at this confidence is applied without approval.
    pub fn is_auto_apply(self) -> bool {
        self.0 >= Self::AUTO_APPLY
    }

    /// Derive confidence from success/failure counts.
    ///
    /// Failures weigh twice as much as successes, and fewer than three
    /// observations scale the score down, so no pattern reaches high
    /// confidence before it has been seen consistently.
    pub fn from_outcomes(successes: u32, failures: u32) -> Self {
        let s = successes as f64;
        let f = failures as f64;
        let denom = s + 2.0 * f;
        let adjusted_rate = if denom > 0.0 { s / denom } else { 0.0 };
        let observation_factor = ((s + f) / 3.0).min(1.0);
        Self((0.3 + adjusted_rate * 0.65 * observation_factor).clamp(Self::FLOOR, Self::CORRECTION_CAP))
    }

    /// Derive the vendor aggregate from its sub-memory confidences and usage count.
    ///
    /// With no sub-memories yet, the default vendor confidence stands.
    pub fn vendor_aggregate(sub_confidences: &[f64], usage_count: u64) -> Self {
        if sub_confidences.is_empty() {
            return Self(DEFAULT_VENDOR_CONFIDENCE);
        }
        let avg = sub_confidences.iter().sum::<f64>() / sub_confidences.len() as f64;
        let usage_factor = (usage_count as f64 / 5.0).min(1.0);
        Self((0.3 + avg * 0.7 * usage_factor).clamp(Self::FLOOR, 1.0))
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(DEFAULT_VENDOR_CONFIDENCE)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl Add for Confidence {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Confidence {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Mul<f64> for Confidence {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Confidence::new(1.7).value(), 1.0);
        assert_eq!(Confidence::new(-0.3).value(), 0.0);
    }

    #[test]
    fn outcomes_stay_within_bounds() {
        assert_eq!(Confidence::from_outcomes(0, 0).value(), 0.3);
        assert_eq!(Confidence::from_outcomes(100, 0).value(), Confidence::CORRECTION_CAP);
        assert_eq!(Confidence::from_outcomes(0, 100).value(), 0.3);
    }

    #[test]
    fn three_consistent_observations_reach_cap() {
        assert!(Confidence::from_outcomes(2, 0).value() < Confidence::CORRECTION_CAP);
        assert_eq!(Confidence::from_outcomes(3, 0).value(), Confidence::CORRECTION_CAP);
    }

    #[test]
    fn failures_weigh_double() {
        let one_failure = Confidence::from_outcomes(4, 1);
        let one_missing_success = Confidence::from_outcomes(3, 0);
        // 4/(4+2) < 3/3: a failure costs more than a success buys.
        assert!(one_failure.value() < one_missing_success.value());
    }

    #[test]
    fn vendor_aggregate_needs_usage_to_grow() {
        let low_usage = Confidence::vendor_aggregate(&[0.9, 0.9], 1);
        let high_usage = Confidence::vendor_aggregate(&[0.9, 0.9], 5);
        assert!(low_usage < high_usage);
        assert!((high_usage.value() - (0.3 + 0.9 * 0.7)).abs() < 1e-9);
    }

    #[test]
    fn vendor_aggregate_defaults_without_sub_memories() {
        assert_eq!(
            Confidence::vendor_aggregate(&[], 10).value(),
            crate::constants::DEFAULT_VENDOR_CONFIDENCE
        );
    }
}
