//! Mapping engine errors to HTTP responses.

use axum::{http::StatusCode, Json};
use bazaar_core::{AddItemStage, EngineError, ErrorKind};
use serde::Serialize;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<AddItemStage>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message: message.into(),
            kind: Some(ErrorKind::BadInput),
            stage: None,
        }),
    )
}

/// Client errors echo their message; internal failures only name the
/// failing stage. The engine has already logged the cause.
pub fn engine_error(e: &EngineError) -> ApiError {
    let status = match e.kind() {
        ErrorKind::BadInput | ErrorKind::InvalidName => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConstraintViolation
        | ErrorKind::IoFailure
        | ErrorKind::SourceUnreadable
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if e.is_client_error() {
        e.to_string()
    } else {
        match e.stage() {
            Some(stage) => format!("Failed to add item ({})", stage),
            None => "Internal server error".to_string(),
        }
    };

    (
        status,
        Json(ErrorResponse {
            message,
            kind: Some(e.kind()),
            stage: e.stage(),
        }),
    )
}
