//! Error handling module
//!
//! Provides unified error types for the entire application. Every
//! error renders as the standard response envelope with the HTTP
//! status matching the envelope's `statusCode`.

use crate::models::ApiResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Validation error")]
    Validation(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Status code this error maps to on the wire
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Messages exposed to clients. Storage and internal failures are
    /// logged but never leak their diagnostic text onto the wire.
    fn client_messages(&self) -> Vec<String> {
        match self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                vec!["A database error occurred.".to_string()]
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                vec!["Database connection pool exhausted.".to_string()]
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                vec!["An internal error occurred.".to_string()]
            }
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                vec!["A configuration error occurred.".to_string()]
            }
            AppError::Validation(messages) => messages.clone(),
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => vec![msg.clone()],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope: ApiResponse<()> =
            ApiResponse::failure(self.status(), self.client_messages());
        envelope.into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper to turn validator output into a single validation error
pub fn validation_failure(errors: &validator::ValidationErrors) -> AppError {
    let messages = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"))
            })
        })
        .collect();
    AppError::Validation(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let err = AppError::Internal("connection refused at 10.0.0.3:5432".into());
        let messages = err.client_messages();

        assert_eq!(messages, vec!["An internal error occurred.".to_string()]);
    }

    #[test]
    fn test_validation_messages_pass_through() {
        let err = AppError::Validation(vec!["Villa name already exists.".to_string()]);
        assert_eq!(
            err.client_messages(),
            vec!["Villa name already exists.".to_string()]
        );
    }
}
