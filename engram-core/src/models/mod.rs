pub mod audit;
pub mod decision;
pub mod human;
pub mod ledger;
pub mod outcome;
pub mod proposal;
pub mod stats;
pub mod target;
pub mod update;

pub use audit::{AuditEntry, PipelineStep};
pub use decision::{Decision, Escalation};
pub use human::{FieldCorrection, HumanCorrection};
pub use ledger::ProcessedInvoice;
pub use outcome::PipelineOutcome;
pub use proposal::ProposedCorrection;
pub use stats::StoreStats;
pub use target::{CorrectionTarget, DocumentField, LineItemField};
pub use update::{MemoryUpdate, MemoryUpdateKind};
