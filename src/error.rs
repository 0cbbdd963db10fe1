//! Application Error Types
//!
//! Every handler returns `Result<_, AppError>`. Internal failures are logged
//! here with their detail and reach the client only as a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a missing/invalid/expired token
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

/// JSON error body: `{error, message}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Hash(_) | AppError::Signing(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client
    fn public_message(&self) -> String {
        match self {
            AppError::Hash(_) | AppError::Signing(_) | AppError::Storage(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Uniform rejection for every authentication failure
    pub fn unauthenticated() -> Self {
        AppError::Unauthorized("Authentication required".to_string())
    }

    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Invalid username or password".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthenticated().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Storage(anyhow::anyhow!("connection refused")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::Storage(anyhow::anyhow!("relation \"products\" does not exist"));
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Hash("salt too short".into());
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Validation("Username and password are required".into());
        assert_eq!(err.public_message(), "Username and password are required");
    }
}
