pub mod storage_error;

pub use storage_error::StorageError;

/// Unified error type for the whole workspace.
///
/// Missing data (no vendor memory, no purchase orders) is never an error;
/// those conditions are `None`/empty results. Errors here are the fatal
/// conditions each stage propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("memory not found: {id}")]
    NotFound { id: String },
}

pub type EngramResult<T> = Result<T, EngramError>;
