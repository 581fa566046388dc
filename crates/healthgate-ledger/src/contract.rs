//! The contract-client seam.
//!
//! Everything behind these traits — transport, signing, endorsement — is an
//! external collaborator. The gateway registry only ever sees `connect`,
//! `submit`, `evaluate` and `disconnect`.

use crate::error::LedgerResult;
use crate::wallet::WalletIdentity;
use async_trait::async_trait;
use std::sync::Arc;

/// Transaction names exposed by the healthcare contract.
pub mod tx {
    pub const REGISTER_PATIENT: &str = "RegisterPatient";
    pub const GET_PATIENT: &str = "GetPatient";
    pub const REGISTER_DOCTOR: &str = "RegisterDoctor";
    pub const GET_DOCTOR: &str = "GetDoctor";
    pub const VERIFY_DOCTOR: &str = "VerifyDoctor";
    pub const GRANT_ACCESS: &str = "GrantAccess";
    pub const REVOKE_ACCESS: &str = "RevokeAccess";
    pub const CHECK_ACCESS_VALIDITY: &str = "CheckAccessValidity";
    pub const GET_ACTIVE_ACCESSES_FOR_PATIENT: &str = "GetActiveAccessesForPatient";
}

/// Opens contract handles for a wallet identity, scoped to one
/// channel/chaincode pair.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(
        &self,
        identity: &WalletIdentity,
        channel: &str,
        chaincode: &str,
    ) -> LedgerResult<Arc<dyn ContractClient>>;
}

/// A live contract handle.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Run a state-changing transaction; returns the contract's payload.
    async fn submit(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>>;

    /// Run a read-only query.
    async fn evaluate(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>>;

    /// Tear down the underlying connection. Default is a no-op for
    /// backends with nothing to release.
    async fn disconnect(&self) {}
}
