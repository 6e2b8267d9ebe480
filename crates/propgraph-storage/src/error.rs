//! Storage error types.

use propgraph_core::{CoreError, EdgeId, VertexId};
use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A transaction could not be started.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A table could not be opened.
    #[error("table error: {0}")]
    Table(String),

    /// A read or write against a table failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A write transaction could not be committed.
    #[error("commit error: {0}")]
    Commit(String),

    /// A stored record could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A vertex was not found.
    #[error("vertex not found: {0}")]
    VertexNotFound(VertexId),

    /// An edge was not found.
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A property key was empty or reserved.
    #[error("invalid property key: {0:?}")]
    InvalidProperty(String),
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        Self::Open(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Transaction(err.to_string())
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        Self::Table(err.to_string())
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        Self::Commit(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let missing = StorageError::VertexNotFound(VertexId::new(4));
        assert_eq!(missing.to_string(), "vertex not found: v4");
        assert_eq!(StorageError::EdgeNotFound(EdgeId::new(2)).to_string(), "edge not found: e2");
        assert_eq!(
            StorageError::InvalidProperty("label".to_owned()).to_string(),
            "invalid property key: \"label\""
        );
    }

    #[test]
    fn core_error_becomes_encoding() {
        let err: StorageError = CoreError::Encoding("truncated".to_owned()).into();
        assert!(matches!(err, StorageError::Encoding(msg) if msg.contains("truncated")));
    }
}
