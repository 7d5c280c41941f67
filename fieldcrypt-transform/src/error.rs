//! Error types for the transform layer

use fieldcrypt_path::{ParseError, ResolutionError};
use thiserror::Error;

/// Failure reported by a crypto backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Backend is unavailable or failed on its side; retrying may succeed
    #[error("Crypto service server error: {message}")]
    Server {
        /// Backend-provided description
        message: String,
    },
    /// Request was refused (bad key, permission, malformed ciphertext)
    #[error("Crypto service client error: {message}")]
    Client {
        /// Backend-provided description
        message: String,
    },
}

impl ServiceError {
    /// Retriable backend failure
    pub fn server(message: impl Into<String>) -> Self {
        ServiceError::Server {
            message: message.into(),
        }
    }

    /// Permanent backend failure
    pub fn client(message: impl Into<String>) -> Self {
        ServiceError::Client {
            message: message.into(),
        }
    }

    /// Whether the host should retry the record
    pub fn is_retriable(&self) -> bool {
        matches!(self, ServiceError::Server { .. })
    }
}

/// Transform error types
#[derive(Debug, Error)]
pub enum TransformError {
    /// A configured path expression is malformed.
    #[error(transparent)]
    Path(#[from] ParseError),
    /// A path could not be resolved against the record.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// The crypto backend failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// A selected field holds a value that cannot be sent to the backend.
    #[error(
        "Cannot transform field '{path}': found {found}.\n\
         \n\
         Only string and bytes values can be encrypted or decrypted.\n\
         Narrow the path expression so it selects leaf text or binary fields."
    )]
    UnsupportedValue {
        /// Resolved path of the offending field
        path: String,
        /// Kind of value found there
        found: &'static str,
    },
    /// Configuration is inconsistent.
    #[error("Invalid transform configuration: {0}")]
    InvalidConfig(String),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransformError {
    /// Whether the host should retry the record instead of failing it
    pub fn is_retriable(&self) -> bool {
        match self {
            TransformError::Service(err) => err.is_retriable(),
            _ => false,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_server_errors_are_retriable() {
        assert!(TransformError::from(ServiceError::server("down")).is_retriable());
        assert!(!TransformError::from(ServiceError::client("denied")).is_retriable());
        assert!(!TransformError::InvalidConfig("x".into()).is_retriable());
    }

    #[test]
    fn unsupported_value_names_the_path() {
        let err = TransformError::UnsupportedValue {
            path: "$.count".to_string(),
            found: "number",
        };
        let message = err.to_string();
        assert!(message.contains("'$.count'"));
        assert!(message.contains("number"));
    }
}
