//! # engram-decide
//!
//! The DECIDE stage: a fixed set of independent escalation rules plus the
//! ordered overall-confidence computation. Total: every document resolves
//! to a definite review/no-review outcome; the worst case is an escalation,
//! never an error.

pub mod engine;
pub mod rules;
pub mod score;

pub use engine::DecideEngine;
