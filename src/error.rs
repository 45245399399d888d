use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::db::StoreError;
use crate::validation::FieldErrors;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(FieldErrors),
    BadRequest(String),
    /// A request the extractors refused, with the status they chose.
    Rejected(StatusCode, String),
    Storage(StoreError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                write!(f, "Validation failed: {}", fields.join(", "))
            }
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Rejected(status, msg) => write!(f, "Rejected ({status}): {msg}"),
            AppError::Storage(err) => write!(f, "Storage Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {msg}");
                StatusCode::NOT_FOUND.into_response()
            }
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, axum::Json(errors)).into_response()
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "detail": msg })),
            )
                .into_response(),
            AppError::Rejected(status, msg) => {
                (status, axum::Json(json!({ "detail": msg }))).into_response()
            }
            AppError::Storage(err) => {
                tracing::error!("Storage error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}
