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

    #[test]
    fn test_error_to_http_status_invalid_input() {
        let error = Error::InvalidInput("url is required".to_string());
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.error_code(), "invalid_input");
    }

    #[test]
    fn test_error_to_http_status_probe_failure() {
        let error = Error::Probe("video unavailable".to_string());
        assert_eq!(error.status_code(), 502);
        assert_eq!(error.error_code(), "probe_failed");
    }

    #[test]
    fn test_error_to_http_status_fetch_failure() {
        let error = Error::Fetch("no output produced".to_string());
        assert_eq!(error.status_code(), 500);
        assert_eq!(error.error_code(), "fetch_failed");
    }

    #[test]
    fn test_error_to_http_status_shutting_down() {
        let error = Error::ShuttingDown;
        assert_eq!(error.status_code(), 503);
        assert_eq!(error.error_code(), "shutting_down");
    }

    #[tokio::test]
    async fn test_error_into_response() {
        let error = Error::InvalidInput("url is required".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Extract and verify the JSON body
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "invalid_input");
        assert!(api_error.error.message.contains("url is required"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_into_response() {
        let error = Error::FetchTimeout { seconds: 1800 };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "fetch_timeout");
        assert_eq!(
            api_error.error.details.as_ref().unwrap()["timeout_seconds"],
            1800
        );
    }

    #[tokio::test]
    async fn test_probe_error_into_response_is_bad_gateway() {
        let error = Error::Probe("geo-restricted".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "probe_failed");
        assert!(api_error.error.message.contains("geo-restricted"));
    }
}
