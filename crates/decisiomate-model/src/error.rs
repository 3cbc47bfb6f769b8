//! Error types for the decisiomate-model crate.
//!
//! Errors fall into three families: input validation (a form field is
//! missing or cannot be coerced), artifact handling (the scaler or weights
//! file is absent, corrupt, or does not match the network), and inference
//! (the forward pass itself failed).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Coarse classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input value.
    Validation,
    /// Missing, unreadable or incompatible artifact file.
    Artifact,
    /// Failure during scaling or the forward pass.
    Inference,
}

impl ErrorKind {
    /// Stable lowercase name, used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Artifact => "artifact",
            Self::Inference => "inference",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while assembling features, loading artifacts or
/// running a prediction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required feature was not supplied.
    #[error("Missing field: {field}")]
    MissingField {
        /// Name of the missing feature
        field: String,
    },

    /// A feature value could not be coerced to its numeric type.
    #[error("Invalid value {value:?} for field {field}: expected {expected}")]
    InvalidField {
        /// Name of the offending feature
        field: String,
        /// The raw submitted value
        value: String,
        /// Human readable name of the expected type
        expected: &'static str,
    },

    /// An artifact file could not be read.
    #[error("Failed to read artifact {path:?}: {source}")]
    ArtifactIo {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An artifact file was read but its content is unusable.
    #[error("Invalid artifact {path:?}: {message}")]
    ArtifactFormat {
        /// Path of the artifact
        path: PathBuf,
        /// Description of the problem
        message: String,
    },

    /// The forward pass failed.
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    /// Create an invalid-field error.
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
            expected,
        }
    }

    /// Create an artifact format error.
    pub fn artifact_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArtifactFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an inference error.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } => ErrorKind::Validation,
            Self::ArtifactIo { .. } | Self::ArtifactFormat { .. } => ErrorKind::Artifact,
            Self::Inference(_) => ErrorKind::Inference,
        }
    }

    /// Check if this error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<candle_core::Error> for ModelError {
    fn from(err: candle_core::Error) -> Self {
        ModelError::Inference(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::MissingField {
            field: "ram".to_string(),
        };
        assert_eq!(err.to_string(), "Missing field: ram");

        let err = ModelError::invalid_field("clock_speed", "fast", "float");
        assert_eq!(
            err.to_string(),
            "Invalid value \"fast\" for field clock_speed: expected float"
        );

        let err = ModelError::inference("nan in output");
        assert_eq!(err.to_string(), "Inference failed: nan in output");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ModelError::invalid_field("ram", "x", "integer").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ModelError::artifact_format("scaler.json", "bad").kind(),
            ErrorKind::Artifact
        );
        let io = ModelError::ArtifactIo {
            path: PathBuf::from("weights.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io.kind(), ErrorKind::Artifact);
        assert_eq!(ModelError::inference("x").kind(), ErrorKind::Inference);
    }

    #[test]
    fn test_is_validation() {
        assert!(ModelError::MissingField {
            field: "wifi".into()
        }
        .is_validation());
        assert!(!ModelError::inference("x").is_validation());
        assert_eq!(ErrorKind::Artifact.to_string(), "artifact");
    }
}
