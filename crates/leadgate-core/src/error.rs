//! Error types module
//!
//! All domain errors are unified under the `AppError` enum. Each variant
//! self-describes its HTTP response characteristics through the
//! `ErrorMetadata` trait so the API layer can render a consistent
//! `{error, message}` JSON body without inspecting error strings.

use std::collections::BTreeMap;
use std::io;

/// Per-field validation messages, keyed by the camelCase field name.
/// A `BTreeMap` keeps serialization order deterministic.
pub type FieldErrors = BTreeMap<String, String>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rate limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORE_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Short client-facing error title (the `error` key of the JSON body)
    fn error_title(&self) -> String;

    /// Client-facing message (the `message` key of the JSON body; never
    /// carries internal detail for sensitive variants)
    fn client_message(&self) -> String;

    /// Whether internal detail must be hidden from the client
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Validation failed ({} field(s))", .0.len())]
    Validation(FieldErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("File uploads are disabled")]
    UploadsDisabled,

    #[error("Upstream provider error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Unauthorized(_) => 401,
            AppError::RateLimited { .. } => 429,
            AppError::Validation(_) | AppError::InvalidInput(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::UploadsDisabled => 403,
            // Upstream 429s surface as 429 to the client; every other
            // upstream status is a server-side problem from its view.
            AppError::Upstream { status: 429, .. } => 429,
            AppError::Upstream { .. } => 500,
            AppError::AlreadyExists(_)
            | AppError::StoreUnavailable(_)
            | AppError::Config(_)
            | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UploadsDisabled => "UPLOADS_DISABLED",
            AppError::Upstream { status: 401, .. } => "AUTH_ERROR",
            AppError::Upstream { status: 429, .. } => "RATE_LIMIT",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn error_title(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::RateLimited { .. } => "Rate limit exceeded".to_string(),
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::InvalidInput(_) => "Invalid request".to_string(),
            AppError::NotFound(_) => "Not found".to_string(),
            AppError::UploadsDisabled => "File upload disabled".to_string(),
            AppError::Upstream { .. } => "Service error".to_string(),
            AppError::AlreadyExists(_) | AppError::StoreUnavailable(_) => {
                "Submission failed".to_string()
            }
            AppError::Config(_) => "Server configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Admin authentication required".to_string(),
            AppError::RateLimited { retry_after_secs } => format!(
                "Too many requests. Please try again in {} seconds.",
                retry_after_secs
            ),
            AppError::Validation(_) => "Please check your form data".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::UploadsDisabled => {
                "File upload functionality is currently disabled".to_string()
            }
            AppError::Upstream { status: 401, .. } => {
                "API authentication failed. Please check configuration.".to_string()
            }
            AppError::Upstream { status: 429, .. } => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            AppError::Upstream { .. } => {
                "I apologize, but I'm having trouble responding right now. Please try again in a moment."
                    .to_string()
            }
            AppError::AlreadyExists(_) | AppError::StoreUnavailable(_) => {
                "An error occurred while processing your submission. Please try again."
                    .to_string()
            }
            AppError::Config(_) => "Please check server configuration".to_string(),
            AppError::Internal(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::AlreadyExists(_)
                | AppError::StoreUnavailable(_)
                | AppError::Upstream { .. }
                | AppError::Config(_)
                | AppError::Internal(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_) | AppError::InvalidInput(_) | AppError::NotFound(_) => {
                LogLevel::Debug
            }
            AppError::Unauthorized(_)
            | AppError::RateLimited { .. }
            | AppError::UploadsDisabled => LogLevel::Warn,
            AppError::AlreadyExists(_)
            | AppError::StoreUnavailable(_)
            | AppError::Upstream { .. }
            | AppError::Config(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_400_and_is_not_sensitive() {
        let mut errors = FieldErrors::new();
        errors.insert("name".to_string(), "Name is required".to_string());
        let err = AppError::Validation(errors);
        assert_eq!(err.http_status_code(), 400);
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn store_errors_hide_internal_detail() {
        let err = AppError::StoreUnavailable("connection refused to 10.0.0.5".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("10.0.0.5"));
    }

    #[test]
    fn upstream_status_controls_response_status() {
        let auth = AppError::Upstream {
            status: 401,
            message: "invalid key".to_string(),
        };
        assert_eq!(auth.http_status_code(), 500);
        assert_eq!(auth.error_code(), "AUTH_ERROR");

        let limited = AppError::Upstream {
            status: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(limited.http_status_code(), 429);
        assert_eq!(limited.error_code(), "RATE_LIMIT");
    }

    #[test]
    fn rate_limited_message_includes_retry_seconds() {
        let err = AppError::RateLimited {
            retry_after_secs: 42,
        };
        assert_eq!(err.http_status_code(), 429);
        assert!(err.client_message().contains("42 seconds"));
    }
}
