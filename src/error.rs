//! Error types for media-dl
//!
//! This module provides the error taxonomy for the service:
//! - Input errors (empty URL), rejected before any side effect
//! - Precondition errors (disk over the capacity threshold)
//! - Execution errors (yt-dlp missing, non-zero exit, I/O failures)
//! - HTTP status code mapping for API integration via [`ToHttpStatus`]
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
///
/// Every failure the download pipeline can produce is represented here, so
/// nothing escapes the service boundary as an unhandled fault. Each variant
/// carries the context needed to build a useful API response.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "threshold_percent")
        key: Option<String>,
    },

    /// Empty or whitespace-only URL; rejected before any process is spawned
    #[error("empty URL provided")]
    EmptyUrl,

    /// Disk usage at or above the configured capacity threshold
    #[error(
        "disk usage at {used_percent:.1}% meets the {threshold_percent}% threshold ({available} bytes free)"
    )]
    InsufficientSpace {
        /// Current used-space percentage of the output filesystem
        used_percent: f64,
        /// Configured threshold that was met or exceeded
        threshold_percent: u8,
        /// Number of bytes currently available on disk
        available: u64,
    },

    /// The external downloader binary could not be found
    #[error("downloader binary not found: {0}")]
    ToolMissing(String),

    /// The external downloader exited with a non-zero status
    #[error("downloader failed (exit code {code:?}): {stderr}")]
    ToolFailed {
        /// Exit code reported by the process, if any
        code: Option<i32>,
        /// Captured standard-error text from the tool
        stderr: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

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
///     "code": "insufficient_storage",
///     "message": "disk usage at 93.2% meets the 90% threshold (1200 bytes free)",
///     "details": {
///       "used_percent": 93.2,
///       "available_bytes": 1200
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
    /// Machine-readable error code (e.g., "empty_url", "download_failed")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    ///
    /// This can include fields like disk usage figures or tool exit codes.
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

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
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
            Error::Config { .. } => 400,
            Error::EmptyUrl => 400,

            // 502 Bad Gateway - the upstream fetch failed
            Error::ToolFailed { .. } => 502,

            // 503 Service Unavailable - server misconfiguration, retryable once fixed
            Error::ToolMissing(_) => 503,

            // 507 Insufficient Storage - precondition refused before spawning
            Error::InsufficientSpace { .. } => 507,

            // 500 Internal Server Error - Server-side issues
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::EmptyUrl => "empty_url",
            Error::InsufficientSpace { .. } => "insufficient_storage",
            Error::ToolMissing(_) => "tool_missing",
            Error::ToolFailed { .. } => "download_failed",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
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
            Error::InsufficientSpace {
                used_percent,
                threshold_percent,
                available,
            } => Some(serde_json::json!({
                "used_percent": used_percent,
                "threshold_percent": threshold_percent,
                "available_bytes": available,
            })),
            Error::ToolFailed { code, stderr } => Some(serde_json::json!({
                "exit_code": code,
                "stderr": stderr,
            })),
            Error::ToolMissing(binary) => Some(serde_json::json!({
                "binary": binary,
            })),
            Error::Config { key, .. } => key.as_ref().map(|k| {
                serde_json::json!({
                    "key": k,
                })
            }),
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
