//! # engram-apply
//!
//! The APPLY stage: normalize an incoming document and propose corrections
//! from the recalled memories and the raw-text extractors. Each correction
//! source is independent; competing proposals for one target are resolved
//! by highest confidence.

pub mod engine;
pub mod sources;

pub use engine::ApplyEngine;
