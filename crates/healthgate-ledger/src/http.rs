//! REST gateway backend.
//!
//! Forwards transactions to a gateway sidecar that fronts the ledger
//! network. The sidecar's endpoint comes from a connection-profile JSON
//! file; the connected identity's MSP and certificate ride along as
//! headers. Transport and endorsement failures surface raw — no retries.

use crate::contract::{ContractClient, LedgerConnector};
use crate::error::{LedgerError, LedgerResult};
use crate::wallet::WalletIdentity;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Network endpoints for one ledger environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Base URL of the REST gateway fronting the network.
    pub gateway_url: String,
}

impl ConnectionProfile {
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let body = std::fs::read(path).map_err(|e| {
            LedgerError::Connection(format!("cannot read connection profile {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&body).map_err(|e| {
            LedgerError::Connection(format!("malformed connection profile {}: {}", path.display(), e))
        })
    }
}

/// Connector that opens REST-backed contract handles.
pub struct HttpGateway {
    profile: ConnectionProfile,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(profile: ConnectionProfile) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LedgerError::Connection(format!("cannot build http client: {e}")))?;
        Ok(Self { profile, client })
    }

    pub fn from_profile_path(path: &Path) -> LedgerResult<Self> {
        Self::new(ConnectionProfile::load(path)?)
    }
}

#[async_trait]
impl LedgerConnector for HttpGateway {
    async fn connect(
        &self,
        identity: &WalletIdentity,
        channel: &str,
        chaincode: &str,
    ) -> LedgerResult<Arc<dyn ContractClient>> {
        let base_url = format!(
            "{}/api/channels/{}/chaincodes/{}",
            self.profile.gateway_url.trim_end_matches('/'),
            channel,
            chaincode
        );
        Ok(Arc::new(HttpContract {
            client: self.client.clone(),
            base_url,
            msp_id: identity.msp_id.clone(),
            certificate: identity.certificate.clone(),
        }))
    }
}

#[derive(Serialize)]
struct TransactionRequest<'a> {
    function: &'a str,
    args: &'a [String],
}

struct HttpContract {
    client: reqwest::Client,
    base_url: String,
    msp_id: String,
    certificate: String,
}

impl HttpContract {
    async fn call(&self, endpoint: &str, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-msp-id", &self.msp_id)
            .header("x-identity-cert", encode_header_value(&self.certificate))
            .json(&TransactionRequest {
                function: transaction,
                args,
            })
            .send()
            .await
            .map_err(|e| LedgerError::Connection(format!("{transaction}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| LedgerError::Connection(format!("{transaction}: {e}")))?;
            return Ok(body.to_vec());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => LedgerError::NotFound(detail),
            StatusCode::FORBIDDEN => LedgerError::PermissionDenied(detail),
            StatusCode::CONFLICT => LedgerError::Duplicate(detail),
            _ => LedgerError::Contract(format!("{transaction} failed with {status}: {detail}")),
        })
    }
}

// PEM blocks contain newlines, which are not valid in header values.
fn encode_header_value(pem: &str) -> String {
    pem.replace(['\r', '\n'], "\\n")
}

#[async_trait]
impl ContractClient for HttpContract {
    async fn submit(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        self.call("transactions", transaction, args).await
    }

    async fn evaluate(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        self.call("query", transaction, args).await
    }
}
