//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::booking::BookingError;
use crate::dashboard::DashboardError;
use crate::repository::RepositoryError;
use crate::shell::ShellError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, unknown or expired session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Booking wizard rejected the operation
    #[error("{0}")]
    Booking(#[from] BookingError),

    /// Dashboard operation failed
    #[error("{0}")]
    Dashboard(#[from] DashboardError),

    /// Login or session failure
    #[error("{0}")]
    Shell(#[from] ShellError),

    /// Reservation repository error
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

fn repository_status(e: &RepositoryError) -> (StatusCode, &'static str) {
    match e {
        RepositoryError::NotFound(_) => (StatusCode::NOT_FOUND, "RESERVATION_NOT_FOUND"),
        RepositoryError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "REPOSITORY_UNAVAILABLE"),
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Booking(e) => match e {
                BookingError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                BookingError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
                BookingError::TableUnavailable(_) => (StatusCode::CONFLICT, "TABLE_UNAVAILABLE"),
                BookingError::Repository(e) => repository_status(e),
            },
            ApiError::Dashboard(e) => repository_status(e.repository_error()),
            ApiError::Shell(e) => match e {
                ShellError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
                ShellError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            },
            ApiError::Repository(e) => repository_status(e),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
