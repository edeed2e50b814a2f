//! HTTP error response handling for the API
//!
//! This module provides conversions from domain errors to HTTP responses
//! with appropriate status codes and JSON error bodies.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

/// Implement IntoResponse for ApiError for explicit error responses
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Default to 500 if we're directly converting an ApiError
        // (usually errors go through Error::into_response which has the status code)
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_url_into_response() {
        let response = Error::EmptyUrl.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "empty_url");
    }

    #[tokio::test]
    async fn test_insufficient_space_into_response() {
        let error = Error::InsufficientSpace {
            used_percent: 94.5,
            threshold_percent: 90,
            available: 2048,
        };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INSUFFICIENT_STORAGE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "insufficient_storage");
        assert_eq!(
            api_error.error.details.as_ref().unwrap()["threshold_percent"],
            90
        );
        assert_eq!(
            api_error.error.details.as_ref().unwrap()["available_bytes"],
            2048
        );
    }

    #[tokio::test]
    async fn test_tool_failed_into_response() {
        let error = Error::ToolFailed {
            code: Some(1),
            stderr: "ERROR: Unsupported URL: http://example.invalid".to_string(),
        };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "download_failed");
        assert!(api_error.error.message.contains("Unsupported URL"));
        assert_eq!(api_error.error.details.as_ref().unwrap()["exit_code"], 1);
    }

    #[tokio::test]
    async fn test_tool_missing_into_response() {
        let error = Error::ToolMissing("yt-dlp".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "tool_missing");
        assert_eq!(api_error.error.details.as_ref().unwrap()["binary"], "yt-dlp");
    }

    #[tokio::test]
    async fn test_api_error_defaults_to_internal_error() {
        let response = ApiError::internal("something broke").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
