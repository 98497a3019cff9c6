//! Unified error type shared by every layer.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Userbase.
///
/// The variants are the error *kinds* callers branch on. Adapters never
/// encode a kind in a message string; a missing row is reported by the store
/// as `Ok(None)` and turned into [`UserbaseError::NotFound`] by the service.
#[derive(Error, Debug)]
pub enum UserbaseError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("{resource_type} with id {id} not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Durable store error
    #[error("Database error: {0}")]
    Database(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Request Lifecycle Errors ============
    /// The request deadline elapsed before the operation finished
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The caller cancelled the request
    #[error("Operation cancelled")]
    Cancelled,

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UserbaseError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is a possibly temporary backend failure.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Cache(_) | Self::Timeout(_))
    }

    /// Checks if this error was caused by request cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for UserbaseError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for UserbaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(UserbaseError::not_found("User", "42").error_code(), "NOT_FOUND");
        assert_eq!(UserbaseError::validation("bad input").error_code(), "VALIDATION_ERROR");
        assert_eq!(UserbaseError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(UserbaseError::cache("down").error_code(), "CACHE_ERROR");
        assert_eq!(UserbaseError::Timeout("t".to_string()).error_code(), "TIMEOUT");
        assert_eq!(UserbaseError::Cancelled.error_code(), "CANCELLED");
        assert_eq!(UserbaseError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_not_found_carries_identity() {
        let err = UserbaseError::not_found("User", "abc-123");
        match &err {
            UserbaseError::NotFound { resource_type, id } => {
                assert_eq!(*resource_type, "User");
                assert_eq!(id, "abc-123");
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
        assert_eq!(err.to_string(), "User with id abc-123 not found");
    }

    #[test]
    fn test_transient_errors() {
        assert!(UserbaseError::Database("connection lost".to_string()).is_transient());
        assert!(UserbaseError::cache("connection refused").is_transient());
        assert!(UserbaseError::Timeout("slow".to_string()).is_transient());
        assert!(!UserbaseError::not_found("User", 1).is_transient());
        assert!(!UserbaseError::validation("bad").is_transient());
        assert!(!UserbaseError::Cancelled.is_transient());
    }

    #[test]
    fn test_cancelled() {
        assert!(UserbaseError::Cancelled.is_cancelled());
        assert!(!UserbaseError::internal("x").is_cancelled());
    }

    #[test]
    fn test_json_error_is_internal() {
        let err: UserbaseError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, UserbaseError::Internal(_)));
    }
}
