//! # engram-storage
//!
//! SQLite persistence layer: one write connection behind a mutex, pragma
//! configuration at open, `user_version`-tracked migrations, and the audit
//! log. Implements `IKnowledgeStore` from engram-core.

pub mod migrations;
pub mod pragmas;
pub mod queries;
pub mod store;

pub use store::SqliteStore;

use engram_core::errors::{EngramError, StorageError};

/// Wrap a low-level SQLite failure into the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> EngramError {
    EngramError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}
