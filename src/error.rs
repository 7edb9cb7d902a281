//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{ErrorKind, WalletError};
use crate::security::HashError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Business errors
    #[error(transparent)]
    Wallet(#[from] WalletError),

    // Infrastructure errors (5xx, except version conflicts)
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

fn wallet_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists | ErrorKind::Unchanged => StatusCode::CONFLICT,
        ErrorKind::Expired
        | ErrorKind::Inactive
        | ErrorKind::InsufficientBalance
        | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::ReadOnly | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            AppError::Wallet(err) => (wallet_status(err.kind()), err.code()),

            AppError::Store(StoreError::VersionConflict { .. }) => {
                (StatusCode::CONFLICT, "version_conflict")
            }
            AppError::Store(err) => {
                tracing::error!("Store error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error")
            }

            AppError::Hashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "hashing_error"),

            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            AppError::Config(err) => {
                tracing::error!("Config error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_status_mapping() {
        assert_eq!(wallet_status(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(wallet_status(ErrorKind::AlreadyExists), StatusCode::CONFLICT);
        assert_eq!(wallet_status(ErrorKind::Unchanged), StatusCode::CONFLICT);
        assert_eq!(wallet_status(ErrorKind::ReadOnly), StatusCode::FORBIDDEN);
        assert_eq!(
            wallet_status(ErrorKind::InsufficientBalance),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            wallet_status(ErrorKind::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
    }
}
