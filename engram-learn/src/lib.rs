//! # engram-learn
//!
//! The LEARN stage, the only mutator of the knowledge store. Routes each
//! human field correction through an explicit update-rule table, reinforces
//! or weakens the matching memories, records resolutions, and finally makes
//! the document visible to future duplicate checks.

pub mod engine;
pub mod rules;
pub mod vendor_locks;

pub use engine::LearnEngine;
