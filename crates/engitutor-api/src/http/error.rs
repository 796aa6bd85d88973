//! Application error type mapping to HTTP status codes.
//!
//! Every error response is the flat shape `{ "error": "<message>" }`:
//! 400 for validation failures, 401 for a missing/invalid owner header,
//! 404 for absent entities, 500 for provider failures and everything
//! unexpected. Provider error detail is logged where it occurs and never
//! appears in a response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use engitutor_types::error::{RelayError, RepositoryError, SendError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Validation error (e.g., empty message).
    Validation(String),
    /// Missing or malformed owner identity.
    Unauthorized(String),
    /// Entity not found (or not owned by the caller).
    NotFound(String),
    /// Relay failure (empty message, provider error, timeout).
    Relay(RelayError),
    /// Generic internal error.
    Internal(String),
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AppError::NotFound("Conversation not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<SendError> for AppError {
    fn from(e: SendError) -> Self {
        match e {
            SendError::Relay(relay) => AppError::Relay(relay),
            SendError::NotActive => AppError::Validation(e.to_string()),
            SendError::Busy => AppError::Validation(e.to_string()),
            SendError::Storage(storage) => storage.into(),
        }
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Relay(RelayError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, "Message is required".to_string())
            }
            AppError::Relay(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_maps_to_bad_request() {
        let (status, message) = AppError::Relay(RelayError::EmptyMessage).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Message is required");
    }

    #[test]
    fn provider_failure_maps_to_generic_500() {
        let (status, message) = AppError::Relay(RelayError::Provider).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Failed to get response from AI");
    }

    #[test]
    fn repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn repository_query_detail_stays_internal() {
        let err: AppError = RepositoryError::Query("disk full".to_string()).into();
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
