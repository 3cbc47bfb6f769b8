//! Error types for the decisiomate-serving crate.

use decisiomate_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur in the serving layer.
#[derive(Debug, Error)]
pub enum ServingError {
    /// Server error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request body could not be read.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Prediction failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A blocking prediction task panicked or was cancelled.
    #[error("Prediction task failed: {0}")]
    TaskFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServingError {
    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if this is a client error (bad request).
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidRequest(_) => true,
            Self::Model(e) => e.is_validation(),
            _ => false,
        }
    }

    /// Message safe to show to users.
    ///
    /// Artifact errors carry file-system paths, so they are replaced by a
    /// generic sentence; the full error is logged by the caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::Model(e) if e.kind() == ErrorKind::Artifact => {
                "The prediction model is currently unavailable.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Stable name of the error family, for API responses.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Model(e) => e.kind().as_str(),
            Self::InvalidRequest(_) => ErrorKind::Validation.as_str(),
            Self::TaskFailed(_) => ErrorKind::Inference.as_str(),
            Self::ConfigError(_) => "config",
            Self::ServerError(_) | Self::IoError(_) => "server",
        }
    }
}

impl From<tokio::task::JoinError> for ServingError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServingError::config("port must be non-zero");
        assert_eq!(
            err.to_string(),
            "Configuration error: port must be non-zero"
        );

        let err: ServingError = ModelError::MissingField {
            field: "ram".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Missing field: ram");
    }

    #[test]
    fn test_is_client_error() {
        let err: ServingError = ModelError::invalid_field("fc", "x", "integer").into();
        assert!(err.is_client_error());
        assert_eq!(err.kind_name(), "validation");

        let err: ServingError = ModelError::inference("boom").into();
        assert!(!err.is_client_error());
        assert_eq!(err.kind_name(), "inference");

        assert!(!ServingError::server("bind failed").is_client_error());
    }

    #[test]
    fn test_invalid_request_is_validation() {
        let err = ServingError::InvalidRequest("truncated body".into());
        assert!(err.is_client_error());
        assert_eq!(err.kind_name(), "validation");
        assert_eq!(err.public_message(), "Invalid request: truncated body");
    }

    #[test]
    fn test_public_message_hides_artifact_paths() {
        let err: ServingError =
            ModelError::artifact_format("/srv/models/weights.json", "bad shape").into();
        assert!(!err.public_message().contains("/srv/models"));
        assert!(err.to_string().contains("/srv/models"));

        let err: ServingError = ModelError::invalid_field("ram", "abc", "integer").into();
        assert_eq!(err.public_message(), err.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err: ServingError = io_err.into();
        assert!(matches!(err, ServingError::IoError(_)));
        assert_eq!(err.kind_name(), "server");
    }
}
