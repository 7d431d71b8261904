//! Unified application error types for Warden.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A lock lease could not be acquired within the wait budget.
    LockTimeout,
    /// The session or refresh token is unknown or already terminal.
    SessionNotFound,
    /// The session exists but its absolute lifetime has elapsed.
    SessionExpired,
    /// The principal does not satisfy an access requirement.
    PermissionDenied,
    /// A single catalogue entry could not be reconciled.
    ReconcileEntryFailed,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (limit reached, concurrent modification, etc.).
    Conflict,
    /// An internal error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A key-value store error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockTimeout => write!(f, "LOCK_TIMEOUT"),
            Self::SessionNotFound => write!(f, "SESSION_NOT_FOUND"),
            Self::SessionExpired => write!(f, "SESSION_EXPIRED"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::ReconcileEntryFailed => write!(f, "RECONCILE_ENTRY_FAILED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error used throughout Warden.
///
/// The `message` is diagnostic and may name internal details; use
/// [`AppError::public_message`] for text shown to end users.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a lock-timeout error.
    pub fn lock_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LockTimeout, message)
    }

    /// Create a session-not-found error.
    pub fn session_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionNotFound, message)
    }

    /// Create a session-expired error.
    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionExpired, message)
    }

    /// Create a permission-denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create a reconcile-entry-failed error.
    pub fn reconcile_entry_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReconcileEntryFailed, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a key-value store error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::LockTimeout
                | ErrorKind::ServiceUnavailable
                | ErrorKind::Cache
                | ErrorKind::Database
        )
    }

    /// Text safe to show to end users.
    ///
    /// Permission failures never reveal which role or resource was missing.
    pub fn public_message(&self) -> &'static str {
        match self.kind {
            ErrorKind::SessionNotFound | ErrorKind::SessionExpired => "Please re-authenticate",
            ErrorKind::PermissionDenied => "Access denied",
            ErrorKind::LockTimeout | ErrorKind::ServiceUnavailable => {
                "Service busy, please retry later"
            }
            ErrorKind::Validation => "Invalid request",
            ErrorKind::Conflict => "Request conflicts with current state",
            _ => "Internal server error",
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::lock_timeout("session-lock:42 busy");
        assert_eq!(err.to_string(), "LOCK_TIMEOUT: session-lock:42 busy");
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(AppError::lock_timeout("x").is_retryable());
        assert!(!AppError::session_not_found("x").is_retryable());
        assert!(!AppError::permission_denied("x").is_retryable());
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = AppError::permission_denied("missing role 'ops'");
        assert_eq!(err.public_message(), "Access denied");
        assert!(!err.public_message().contains("ops"));
        assert_eq!(
            AppError::session_expired("x").public_message(),
            AppError::session_not_found("y").public_message()
        );
    }
}
