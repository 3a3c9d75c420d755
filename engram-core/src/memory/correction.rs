//! Correction memories: one recognized, repeatable correction pattern per
//! (vendor, target, pattern) triple, with success/failure-weighted confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::confidence::Confidence;
use crate::models::CorrectionTarget;

/// What a correction memory does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    ExtractFromRawText,
    RecalculateTax,
    MatchPo,
    MapSku,
    SetCurrency,
    SetPaymentTerms,
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExtractFromRawText => "extract_from_raw_text",
            Self::RecalculateTax => "recalculate_tax",
            Self::MatchPo => "match_po",
            Self::MapSku => "map_sku",
            Self::SetCurrency => "set_currency",
            Self::SetPaymentTerms => "set_payment_terms",
        };
        f.write_str(name)
    }
}

/// One recognized correction pattern for a (vendor, target) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionMemory {
    /// UUID v4 identifier.
    pub id: String,
    pub vendor_name: String,
    pub target: CorrectionTarget,
    /// The recognizable trigger, e.g. an anchor label or a rationale phrase.
    pub pattern: String,
    pub kind: CorrectionKind,
    pub correction_value: String,
    /// Derived from the counts below; see [`Confidence::from_outcomes`].
    pub confidence: Confidence,
    pub success_count: u32,
    pub failure_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CorrectionMemory {
    /// A fresh pattern with no observations yet; reinforce or weaken next.
    pub fn new(
        vendor_name: &str,
        target: CorrectionTarget,
        pattern: &str,
        kind: CorrectionKind,
        correction_value: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vendor_name: vendor_name.to_string(),
            target,
            pattern: pattern.to_string(),
            kind,
            correction_value: correction_value.to_string(),
            confidence: Confidence::from_outcomes(0, 0),
            success_count: 0,
            failure_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Count a confirming observation and recompute confidence.
    pub fn reinforce(&mut self) {
        self.success_count += 1;
        self.recount();
    }

    /// Count a rejecting observation and recompute confidence.
    pub fn weaken(&mut self) {
        self.failure_count += 1;
        self.recount();
    }

    fn recount(&mut self) {
        self.confidence = Confidence::from_outcomes(self.success_count, self.failure_count);
        self.updated_at = Utc::now();
    }

    /// A pattern that has failed more often than it succeeded.
    pub fn is_conflicted(&self) -> bool {
        self.failure_count > self.success_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentField;

    fn make() -> CorrectionMemory {
        CorrectionMemory::new(
            "Supplier GmbH",
            CorrectionTarget::document(DocumentField::ServiceDate),
            "Leistungsdatum",
            CorrectionKind::ExtractFromRawText,
            "2024-01-15",
        )
    }

    #[test]
    fn reinforcement_never_decreases_confidence() {
        let mut memory = make();
        let mut previous = memory.confidence;
        for _ in 0..10 {
            memory.reinforce();
            assert!(memory.confidence >= previous);
            previous = memory.confidence;
        }
        assert!(memory.confidence.value() <= Confidence::CORRECTION_CAP);
    }

    #[test]
    fn weakening_never_increases_confidence() {
        let mut memory = make();
        for _ in 0..3 {
            memory.reinforce();
        }
        let mut previous = memory.confidence;
        for _ in 0..10 {
            memory.weaken();
            assert!(memory.confidence <= previous);
            previous = memory.confidence;
        }
        assert!(memory.confidence.value() >= Confidence::FLOOR);
    }

    #[test]
    fn conflicted_when_failures_outnumber_successes() {
        let mut memory = make();
        memory.reinforce();
        memory.weaken();
        assert!(!memory.is_conflicted());
        memory.weaken();
        assert!(memory.is_conflicted());
    }
}
