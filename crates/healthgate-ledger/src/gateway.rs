//! Per-identity ledger session registry.
//!
//! Sessions are created lazily on first use of an identity label, cached,
//! and reused by every subsequent caller. The write lock is held across
//! the connect, so concurrent first-time acquires of one label produce
//! exactly one session.

use crate::contract::{ContractClient, LedgerConnector};
use crate::error::{LedgerError, LedgerResult};
use crate::wallet::FileWallet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A cached connection for one identity label, bound to a single
/// channel/chaincode pair.
pub struct LedgerSession {
    label: String,
    msp_id: String,
    contract: Arc<dyn ContractClient>,
}

impl std::fmt::Debug for LedgerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerSession")
            .field("label", &self.label)
            .field("msp_id", &self.msp_id)
            .finish_non_exhaustive()
    }
}

impl LedgerSession {
    /// Identity label this session was opened under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// MSP of the connected identity.
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub async fn submit(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        self.contract.submit(transaction, args).await
    }

    pub async fn evaluate(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        self.contract.evaluate(transaction, args).await
    }
}

/// Session registry: one live session per identity label.
pub struct GatewayRegistry {
    wallet: FileWallet,
    connector: Arc<dyn LedgerConnector>,
    channel: String,
    chaincode: String,
    sessions: RwLock<HashMap<String, Arc<LedgerSession>>>,
}

impl GatewayRegistry {
    pub fn new(
        wallet: FileWallet,
        connector: Arc<dyn LedgerConnector>,
        channel: impl Into<String>,
        chaincode: impl Into<String>,
    ) -> Self {
        Self {
            wallet,
            connector,
            channel: channel.into(),
            chaincode: chaincode.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached session for `label`, opening one if none exists.
    ///
    /// Fails with [`LedgerError::IdentityNotFound`] when the label is not
    /// in the wallet and [`LedgerError::Connection`] when the network is
    /// unreachable.
    pub async fn acquire(&self, label: &str) -> LedgerResult<Arc<LedgerSession>> {
        if let Some(session) = self.sessions.read().await.get(label) {
            return Ok(session.clone());
        }

        let mut sessions = self.sessions.write().await;
        // Re-check: another task may have connected while we waited.
        if let Some(session) = sessions.get(label) {
            return Ok(session.clone());
        }

        let identity = self
            .wallet
            .get(label)?
            .ok_or_else(|| LedgerError::IdentityNotFound(label.to_string()))?;

        let contract = self
            .connector
            .connect(&identity, &self.channel, &self.chaincode)
            .await?;

        tracing::info!(
            identity = label,
            msp = %identity.msp_id,
            channel = %self.channel,
            "opened ledger session"
        );

        let session = Arc::new(LedgerSession {
            label: label.to_string(),
            msp_id: identity.msp_id,
            contract,
        });
        sessions.insert(label.to_string(), session.clone());
        Ok(session)
    }

    /// Tear down and evict the session for `label`. Idempotent; returns
    /// whether a session existed.
    pub async fn release(&self, label: &str) -> bool {
        let removed = self.sessions.write().await.remove(label);
        match removed {
            Some(session) => {
                session.contract.disconnect().await;
                tracing::info!(identity = label, "closed ledger session");
                true
            }
            None => false,
        }
    }

    /// Tear down every session (process shutdown path).
    pub async fn release_all(&self) {
        let drained: Vec<_> = self.sessions.write().await.drain().collect();
        for (label, session) in drained {
            session.contract.disconnect().await;
            tracing::info!(identity = %label, "closed ledger session");
        }
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;
    use crate::wallet::WalletIdentity;

    fn registry_with(labels: &[(&str, &str)]) -> (tempfile::TempDir, GatewayRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let wallet = FileWallet::open(dir.path()).unwrap();
        for (label, msp) in labels {
            wallet
                .put(label, &WalletIdentity::new("cert", "key", *msp))
                .unwrap();
        }
        let connector = Arc::new(InMemoryLedger::new("AuditOrgMSP"));
        let registry = GatewayRegistry::new(wallet, connector, "healthchannel", "healthcare");
        (dir, registry)
    }

    #[tokio::test]
    async fn acquire_caches_one_session_per_label() {
        let (_dir, registry) = registry_with(&[("admin", "HospitalApolloMSP")]);

        let first = registry.acquire("admin").await.unwrap();
        let second = registry.acquire("admin").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.session_count().await, 1);
        assert_eq!(first.msp_id(), "HospitalApolloMSP");
    }

    #[tokio::test]
    async fn acquire_unknown_label_is_identity_not_found() {
        let (_dir, registry) = registry_with(&[]);

        let err = registry.acquire("ghost").await.unwrap_err();
        assert!(matches!(err, LedgerError::IdentityNotFound(label) if label == "ghost"));
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let (_dir, registry) = registry_with(&[("admin", "HospitalApolloMSP")]);

        registry.acquire("admin").await.unwrap();
        assert!(registry.release("admin").await);
        assert!(!registry.release("admin").await);
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn release_all_drains_every_session() {
        let (_dir, registry) = registry_with(&[
            ("admin", "HospitalApolloMSP"),
            ("auditOrgAdmin", "AuditOrgMSP"),
        ]);

        registry.acquire("admin").await.unwrap();
        registry.acquire("auditOrgAdmin").await.unwrap();
        registry.release_all().await;
        assert_eq!(registry.session_count().await, 0);
    }
}
