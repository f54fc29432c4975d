//! Error types for bias auditing and mitigation.
//!
//! Errors are serializable so a presentation shell can forward them to a
//! frontend as `{ code, message }` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::types::DatasetKind;

/// The main error type for the bias audit pipeline.
#[derive(Error, Debug)]
pub enum BiasError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The regression target could not be read as numbers.
    #[error("Target column '{column}' is not numeric ({dtype})")]
    NonNumericTarget { column: String, dtype: String },

    /// No mitigation transform exists for this dataset kind.
    #[error("Mitigation is not available for {0} datasets")]
    MitigationUnsupported(DatasetKind),

    /// The dataset has no rows or no columns.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BiasError>,
    },
}

impl BiasError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BiasError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NonNumericTarget { .. } => "NON_NUMERIC_TARGET",
            Self::MitigationUnsupported(_) => "MITIGATION_UNSUPPORTED",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the caller can recover by changing its selection rather
    /// than its data.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig(_)
            | Self::MitigationUnsupported(_)
            | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for BiasError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        BiasError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for BiasError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("BiasError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for bias audit operations.
pub type Result<T> = std::result::Result<T, BiasError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BiasError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(BiasError::EmptyDataset.error_code(), "EMPTY_DATASET");
        assert_eq!(
            BiasError::ColumnNotFound("income".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            BiasError::MitigationUnsupported(DatasetKind::Exploratory).error_code(),
            "MITIGATION_UNSUPPORTED"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(BiasError::MitigationUnsupported(DatasetKind::Exploratory).is_recoverable());
        assert!(BiasError::InvalidConfig("x".to_string()).is_recoverable());
        assert!(!BiasError::EmptyDataset.is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = BiasError::ColumnNotFound("gender".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("gender"));
    }

    #[test]
    fn test_with_context_preserves_code() {
        let error = BiasError::ColumnNotFound("target".to_string())
            .with_context("During regression detection");
        assert!(error.to_string().contains("During regression detection"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_unsupported_message_names_kind() {
        let error = BiasError::MitigationUnsupported(DatasetKind::Exploratory);
        assert_eq!(
            error.to_string(),
            "Mitigation is not available for exploratory datasets"
        );
    }
}
