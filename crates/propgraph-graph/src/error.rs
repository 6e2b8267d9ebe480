//! Error types for the query engine.

use thiserror::Error;

/// Errors that can occur while executing an incidence query.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The storage adapter failed while opening or stepping a scan.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl GraphError {
    /// Wrap a storage adapter error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }

    /// Returns the underlying adapter error if it is of type `E`.
    #[must_use]
    pub fn downcast_storage<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Storage(inner) => inner.downcast_ref::<E>(),
        }
    }
}

/// Result type for query operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn error_display() {
        let err = GraphError::storage(io::Error::new(io::ErrorKind::Other, "disk gone"));
        assert_eq!(err.to_string(), "storage error: disk gone");
    }

    #[test]
    fn downcast_recovers_adapter_error() {
        let err = GraphError::storage(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let inner = err.downcast_storage::<io::Error>().unwrap();
        assert_eq!(inner.kind(), io::ErrorKind::NotFound);
        assert!(err.downcast_storage::<std::fmt::Error>().is_none());
    }

    #[test]
    fn source_is_exposed() {
        use std::error::Error as _;
        let err = GraphError::storage(std::fmt::Error);
        assert!(err.source().is_some());
    }
}
