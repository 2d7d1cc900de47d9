use thiserror::Error;

/// Errors produced by the memory subsystem.
///
/// Variants are split into caller errors (bad input or configuration,
/// never retried) and dependency errors (embedding provider or store
/// failure, retried by the retry layer before being surfaced).
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Empty text/query or an out-of-range parameter. Caller error.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Vector length does not match the deployment's fixed dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Collection identifier failed the allow-pattern check.
    #[error("identifier '{0}' is not permitted")]
    InvalidIdentifier(String),

    /// Collection name is outside the local store's fixed allow-list.
    #[error("collection '{0}' is not supported by the local store")]
    UnsupportedCollection(String),

    /// The embedding provider could not be reached or rejected the request.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The backing store failed after retries were exhausted.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The caller cancelled a pending operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl MemoryError {
    /// True for errors caused by the caller's input or configuration.
    ///
    /// The glue layer maps these to 400-class responses; everything else
    /// (provider/store failures) maps to 500/502-class responses.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            MemoryError::InvalidInput(_)
                | MemoryError::DimensionMismatch { .. }
                | MemoryError::InvalidIdentifier(_)
                | MemoryError::UnsupportedCollection(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::DimensionMismatch {
            expected: 32,
            actual: 16,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 32, got 16");

        let err = MemoryError::InvalidIdentifier("drop table".to_string());
        assert!(err.to_string().contains("drop table"));
    }

    #[test]
    fn test_caller_error_classification() {
        assert!(MemoryError::InvalidInput("empty".into()).is_caller_error());
        assert!(MemoryError::DimensionMismatch { expected: 3, actual: 4 }.is_caller_error());
        assert!(MemoryError::InvalidIdentifier("x;y".into()).is_caller_error());
        assert!(MemoryError::UnsupportedCollection("other".into()).is_caller_error());

        assert!(!MemoryError::ProviderUnavailable("timeout".into()).is_caller_error());
        assert!(!MemoryError::Persistence("connection refused".into()).is_caller_error());
        assert!(!MemoryError::Cancelled.is_caller_error());
    }
}
