//! # engram-extract
//!
//! The pluggable raw-text collaborator: lenient multi-format date parsing
//! and the default regex implementation of `ITextExtractor`. Replaceable;
//! the pipeline only depends on the trait contract.

pub mod date;
pub mod extractor;
pub mod patterns;

pub use extractor::RegexExtractor;
