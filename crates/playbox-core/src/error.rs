//! Error types module
//!
//! All errors are unified under the `AppError` enum, which self-describes its
//! HTTP status, machine-readable code, and log severity. The API crate
//! converts it into a response.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream misses and absent objects
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    /// Upstream answered with a non-success status that is propagated to the
    /// client as-is.
    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code to return
    pub fn http_status(&self) -> u16 {
        match self {
            // Oversized forms are a client mistake on this service, not a 413.
            AppError::BadRequest(_) | AppError::PayloadTooLarge(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Upstream { status } => *status,
            AppError::Storage(_) | AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code (e.g. "NOT_FOUND")
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Upstream { .. } => "UPSTREAM_STATUS",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::BadRequest(_) | AppError::PayloadTooLarge(_) => LogLevel::Debug,
            AppError::NotFound(_) | AppError::Upstream { .. } => LogLevel::Warn,
            AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }

    /// Client-facing message. Internal details are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::NotFound(_) => "File not found".to_string(),
            AppError::Upstream { status } => format!("Upstream returned status {}", status),
            AppError::Storage(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let err = AppError::BadRequest("Game ID is required".to_string());
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.error_code(), "BAD_REQUEST");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn oversized_payload_maps_to_400() {
        let err = AppError::PayloadTooLarge("exceeds 100 MB".to_string());
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn upstream_status_is_propagated() {
        let err = AppError::Upstream { status: 403 };
        assert_eq!(err.http_status(), 403);
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn internal_errors_hide_details_from_clients() {
        let err = AppError::Storage("bucket exploded".to_string());
        assert_eq!(err.http_status(), 500);
        assert!(!err.client_message().contains("exploded"));
    }
}
