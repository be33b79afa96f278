//! Store error types.

use crate::Collection;
use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("No document {id} in {collection}")]
    NotFound { collection: Collection, id: String },

    /// A document body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing the backing files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document body was not a JSON object.
    #[error("Invalid document {id}: {reason}")]
    InvalidDocument { id: String, reason: String },

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
