//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An encoding or decoding error occurred.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A validation error occurred.
    #[error("validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::Encoding("truncated".to_owned());
        assert_eq!(err.to_string(), "encoding error: truncated");
        assert_eq!(
            CoreError::Validation("unknown direction: UP".to_owned()).to_string(),
            "validation error: unknown direction: UP"
        );
    }
}
