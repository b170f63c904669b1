//! Error types for the marginal crate

use thiserror::Error;

/// Result type alias for marginal operations
pub type Result<T> = std::result::Result<T, MarginalError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum MarginalError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Predictor error: {0}")]
    Predictor(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MarginalError {
    /// Wrap a predictor failure, keeping the original cause attached.
    pub fn predictor(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        MarginalError::Predictor(Box::new(err))
    }
}

impl From<polars::error::PolarsError> for MarginalError {
    fn from(err: polars::error::PolarsError) -> Self {
        MarginalError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for MarginalError {
    fn from(err: serde_json::Error) -> Self {
        MarginalError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarginalError::FeatureNotFound("wind".to_string());
        assert_eq!(err.to_string(), "Feature not found: wind");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MarginalError = io_err.into();
        assert!(matches!(err, MarginalError::IoError(_)));
    }

    #[test]
    fn test_predictor_error_keeps_cause() {
        let cause = MarginalError::DataError("bad column".to_string());
        let err = MarginalError::predictor(cause);
        let source = std::error::Error::source(&err).expect("source attached");
        assert_eq!(source.to_string(), "Data error: bad column");
    }
}
