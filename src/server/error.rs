//! Error envelope shared by every endpoint.
//!
//! Failures render as `{"success": false, "error": <status>, "message": <text>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Unprocessable,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::BadRequest => "Bad Request",
            ApiError::NotFound => "Resource Not Found",
            ApiError::MethodNotAllowed => "Method Not Allowed",
            ApiError::Unprocessable => "Unprocessable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        tracing::error!("Storage operation failed: {error}");
        ApiError::Unprocessable
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
