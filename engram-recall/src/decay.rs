//! Advisory confidence decay: `max(0.1, confidence × rate^days)`.
//!
//! Computed on demand when memories are read for a decision; the stored
//! confidence is never written back.

use chrono::{DateTime, Utc};

use engram_core::memory::Confidence;

/// Elapsed days between a memory's last use and now, never negative.
pub fn days_since(last_used: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_used).num_seconds().max(0) as f64 / 86_400.0
}

/// Attenuate a stored confidence by elapsed days since last use.
pub fn decayed_confidence(confidence: Confidence, days: f64, daily_rate: f64) -> Confidence {
    let factor = daily_rate.powf(days.max(0.0));
    Confidence::new((confidence.value() * factor).max(Confidence::FLOOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f64 = engram_core::constants::DAILY_DECAY_RATE;

    #[test]
    fn zero_days_is_identity() {
        let c = Confidence::new(0.8);
        assert_eq!(decayed_confidence(c, 0.0, RATE), c);
    }

    #[test]
    fn decay_is_monotone_in_elapsed_days() {
        let c = Confidence::new(0.9);
        let mut previous = decayed_confidence(c, 0.0, RATE);
        for days in 1..400 {
            let current = decayed_confidence(c, days as f64, RATE);
            assert!(current <= previous, "day {days} increased");
            previous = current;
        }
    }

    #[test]
    fn decay_never_drops_below_the_floor() {
        let c = Confidence::new(0.95);
        let distant = decayed_confidence(c, 10_000.0, RATE);
        assert_eq!(distant.value(), Confidence::FLOOR);
    }

    #[test]
    fn negative_elapsed_time_is_treated_as_zero() {
        let c = Confidence::new(0.7);
        assert_eq!(decayed_confidence(c, -5.0, RATE), c);
    }
}
