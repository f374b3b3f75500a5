//! API error type mapped to HTTP status codes.
//!
//! Every variant renders as `{"error": "message"}`.

use super::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gradebook_core::GradebookError;

/// Handler-level error.
///
/// - `BadRequest` → 400
/// - `NotFound` → 404
/// - `TooManyRequests` → 429
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request data (400).
    BadRequest(String),
    /// No record with the addressed id (404).
    NotFound(String),
    /// Global rate limit exceeded (429).
    TooManyRequests(String),
    /// Storage or serialization failure (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<GradebookError> for ApiError {
    fn from(err: GradebookError) -> Self {
        match err {
            GradebookError::Validation(msg) => ApiError::BadRequest(msg),
            GradebookError::NotFound(_) => ApiError::NotFound(err.to_string()),
            GradebookError::Storage(_) | GradebookError::Serialization(_) | GradebookError::Io(_) => {
                tracing::error!("Request failed: {}", err);
                ApiError::Internal("Internal storage error".to_string())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use gradebook_core::RecordId;

    #[test]
    fn not_found_maps_to_404_with_id_message() {
        let err = ApiError::from(GradebookError::NotFound(RecordId(5)));
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Student with ID 5 not found"),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn storage_maps_to_500() {
        let response = ApiError::from(GradebookError::Storage("disk".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        let response =
            ApiError::from(GradebookError::Validation("bad".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
