//! Error types for the ledger layer.

use thiserror::Error;

/// Failures surfaced by the wallet, the session registry and contract
/// backends. Callers see the raw failure; no retry policy is applied here.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The identity label is not present in the wallet.
    #[error("identity {0} not found in wallet")]
    IdentityNotFound(String),

    /// The gateway endpoint could not be reached.
    #[error("ledger connection error: {0}")]
    Connection(String),

    /// The requested ledger record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record with the same key already exists on the ledger.
    #[error("already registered: {0}")]
    Duplicate(String),

    /// The connected identity's MSP is not allowed to run this transaction.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The contract rejected the transaction.
    #[error("contract error: {0}")]
    Contract(String),

    /// Wallet I/O or malformed wallet entry.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
