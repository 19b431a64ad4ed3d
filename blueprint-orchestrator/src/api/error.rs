//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blueprint_compiler::{CompileError, ErrorKind};

use crate::service::compile_service::CompileServiceError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    DatabaseError(sqlx::Error),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

/// A body that is not a valid request (bad JSON, unknown entity, missing
/// field) is the caller's fault, whatever axum would answer by default.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<CompileError> for ApiError {
    fn from(err: CompileError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::BadInput => ApiError::BadRequest(message),
            ErrorKind::Internal => ApiError::InternalError(message),
        }
    }
}

impl From<CompileServiceError> for ApiError {
    fn from(err: CompileServiceError) -> Self {
        match err {
            CompileServiceError::Compile(err) => err.into(),
            CompileServiceError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
