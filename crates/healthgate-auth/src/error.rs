//! Error types for the authentication layer.

use thiserror::Error;

/// Credential-store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (identifier, aadhar number, license number) collided.
    #[error("duplicate identifier: {0}")]
    Duplicate(String),

    /// Backend connection or query failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Auth-service failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration hit an existing unique key.
    #[error("duplicate identifier: {0}")]
    Duplicate(String),

    /// Identifier absent, record inactive, or password mismatch — the
    /// caller cannot tell which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Signature mismatch or expired token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token could not be signed.
    #[error("token issue failed: {0}")]
    TokenIssue(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Credential-store backend failure.
    #[error("credential store error: {0}")]
    Store(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(key) => AuthError::Duplicate(key),
            StoreError::Backend(message) => AuthError::Store(message),
        }
    }
}

/// Result alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
