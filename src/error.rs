//! Museion error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Museion error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Durable medium refused a write because it is full
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: u64, quota: u64 },

    /// Caller supplied data that does not fit the contract
    #[error("Validation error: {0}")]
    Validation(String),

    /// Collectable is flagged as out of stock
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// Entity lookup failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// AI curator error
    #[error("Curator error: {0}")]
    Curator(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Museion operations
pub type Result<T> = std::result::Result<T, Error>;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn with_code(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code("NOT_FOUND", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code("BAD_REQUEST", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_code("FORBIDDEN", message)
    }

    pub fn storage_full(message: impl Into<String>) -> Self {
        Self::with_code("STORAGE_WRITE_FAILED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code("INTERNAL_ERROR", message)
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation(_) | Error::OutOfStock(_) => Self::bad_request(err.to_string()),
            Error::NotFound(_) => Self::not_found(err.to_string()),
            Error::Storage(_) | Error::QuotaExceeded { .. } => Self::storage_full(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::OutOfStock(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) | Error::QuotaExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
            Error::Curator(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }
        (status, Json(ApiError::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_message() {
        let err = Error::QuotaExceeded {
            needed: 2048,
            quota: 1024,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded: 2048 bytes needed, 1024 bytes allowed"
        );
    }

    #[test]
    fn test_api_error_codes() {
        let api = ApiError::from(&Error::OutOfStock("Bronze Cat".to_string()));
        assert_eq!(api.error.code, "BAD_REQUEST");

        let api = ApiError::from(&Error::NotFound("ord-1".to_string()));
        assert_eq!(api.error.code, "NOT_FOUND");

        let api = ApiError::from(&Error::Storage("disk".to_string()));
        assert_eq!(api.error.code, "STORAGE_WRITE_FAILED");

        let json = serde_json::to_string(&api).unwrap();
        assert!(json.contains("\"code\":\"STORAGE_WRITE_FAILED\""));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::QuotaExceeded { needed: 2, quota: 1 }.status_code(),
            StatusCode::INSUFFICIENT_STORAGE
        );
        assert_eq!(
            Error::Config("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
