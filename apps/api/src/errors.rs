use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::validation::ValidationErrors;
use crate::session::controller::{BeginError, TransitionError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Carries the user-facing message only; the cause is logged where it happens.
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl From<BeginError> for AppError {
    fn from(err: BeginError) -> Self {
        match err {
            BeginError::Invalid(errors) => AppError::Validation(errors),
            BeginError::Transition(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Please fill in the required fields".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Generation(msg) => (StatusCode::BAD_GATEWAY, "GENERATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": {
                    "code": code,
                    "message": message,
                    "fields": fields
                }
            }),
            _ => json!({
                "error": {
                    "code": code,
                    "message": message
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}
