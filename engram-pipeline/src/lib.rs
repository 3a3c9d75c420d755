//! # engram-pipeline
//!
//! Wires the four stages over one explicitly passed store handle. `process`
//! is the read path (Recall → Apply → Decide); `absorb` is the asynchronous
//! learn path invoked when human feedback arrives. Each step leaves one
//! audit entry keyed by the document id.

pub mod engine;

pub use engine::Engine;
