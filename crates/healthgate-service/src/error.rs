//! Error types for the healthgate service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use healthgate_auth::AuthError;
use healthgate_ledger::LedgerError;
use serde::Serialize;
use thiserror::Error;

/// Service-level errors (bootstrap and lifecycle).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Credential-store error
    #[error("Store error: {0}")]
    Store(String),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-level errors, mapped onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failed password or token check
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's identity may not perform this action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Record absent from the ledger
    #[error("Not found: {0}")]
    NotFound(String),

    /// Ledger identity label absent from the wallet
    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    /// Unique identifier already registered
    #[error("Duplicate identifier: {0}")]
    Duplicate(String),

    /// The ledger network could not be reached
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::IdentityNotFound(label) => ApiError::IdentityNotFound(label),
            LedgerError::Connection(message) => ApiError::LedgerUnavailable(message),
            LedgerError::NotFound(what) => ApiError::NotFound(what),
            LedgerError::Duplicate(what) => ApiError::Duplicate(what),
            LedgerError::PermissionDenied(message) => ApiError::Forbidden(message),
            LedgerError::Contract(message)
            | LedgerError::Wallet(message)
            | LedgerError::Serialization(message) => ApiError::Internal(message),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Duplicate(key) => ApiError::Duplicate(key),
            AuthError::InvalidCredentials => ApiError::Unauthorized("invalid credentials".into()),
            AuthError::InvalidToken(message) => ApiError::Unauthorized(message),
            AuthError::TokenIssue(message)
            | AuthError::Hash(message)
            | AuthError::Store(message) => ApiError::Internal(message),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::IdentityNotFound(_) => (StatusCode::NOT_FOUND, "IDENTITY_NOT_FOUND"),
            ApiError::Duplicate(_) => (StatusCode::CONFLICT, "DUPLICATE_IDENTIFIER"),
            ApiError::LedgerUnavailable(_) => (StatusCode::BAD_GATEWAY, "LEDGER_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for service lifecycle operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_status_codes() {
        assert_eq!(
            ApiError::Validation("missing field".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Duplicate("P1".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NotFound("doctor D1".into())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::LedgerUnavailable("peer down".into())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn ledger_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            ApiError::from(LedgerError::NotFound("doctor D1".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(LedgerError::PermissionDenied("wrong msp".into())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(LedgerError::Duplicate("patient P1".into())),
            ApiError::Duplicate(_)
        ));
        assert!(matches!(
            ApiError::from(LedgerError::IdentityNotFound("admin".into())),
            ApiError::IdentityNotFound(_)
        ));
    }

    #[test]
    fn auth_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Duplicate("P1".into())),
            ApiError::Duplicate(_)
        ));
    }
}
