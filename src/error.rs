//! Error types for vidclip-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (input validation, probe, fetch, filesystem)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for vidclip-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vidclip-dl
///
/// This is the primary error type used throughout the library. Each variant
/// corresponds to one failure kind surfaced to API callers.
#[derive(Debug, Error)]
pub enum Error {
    /// Request input was missing or malformed (empty URL, unparseable clip time)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Metadata probe against the source failed (network, geo-restriction, private video)
    #[error("probe failed: {0}")]
    Probe(String),

    /// The external fetch produced no usable artifact (non-zero exit, no locatable file)
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The external fetch exceeded the configured time budget
    #[error("fetch timed out after {seconds}s")]
    FetchTimeout {
        /// The time budget that was exhausted, in seconds
        seconds: u64,
    },

    /// Temp directory creation/removal or file access failed
    #[error("filesystem error: {message}")]
    Filesystem {
        /// Human-readable description of the filesystem failure
        message: String,
        /// The path involved, when known
        path: Option<PathBuf>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The external media-fetch binary could not be located
    #[error("media-fetch tool not available: {0}")]
    ToolMissing(String),

    /// Shutdown in progress - not accepting new work
    #[error("shutdown in progress: not accepting new requests")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
/// It follows a standard format with machine-readable error codes,
/// human-readable messages, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "fetch_timeout",
///     "message": "fetch timed out after 1800s",
///     "details": {
///       "timeout_seconds": 1800
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "invalid_input", "fetch_failed")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("invalid_input", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    /// Create a "service unavailable" error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new("service_unavailable", message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::InvalidInput(_) => 400,

            // 502 Bad Gateway - The upstream source rejected or broke the probe
            Error::Probe(_) => 502,

            // 504 Gateway Timeout - The external fetch exceeded its budget
            Error::FetchTimeout { .. } => 504,

            // 500 Internal Server Error - Server-side issues
            Error::Fetch(_) => 500,
            Error::Filesystem { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 503 Service Unavailable
            Error::ToolMissing(_) => 503,
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::Probe(_) => "probe_failed",
            Error::Fetch(_) => "fetch_failed",
            Error::FetchTimeout { .. } => "fetch_timeout",
            Error::Filesystem { .. } => "filesystem_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ToolMissing(_) => "tool_missing",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::FetchTimeout { seconds } => Some(serde_json::json!({
                "timeout_seconds": seconds,
            })),
            Error::Filesystem {
                path: Some(path), ..
            } => Some(serde_json::json!({
                "path": path,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
