//! # engram-recall
//!
//! The RECALL stage: pure read path assembling the `RecalledMemories`
//! snapshot for one document: vendor memory, correction memories ordered by
//! decayed confidence, resolution history, and the duplicate probe.

pub mod decay;
pub mod engine;

pub use engine::RecallEngine;
