//! Ledger access layer: identity wallet, per-identity session registry and
//! the contract-client seam behind which the distributed-ledger network
//! lives.
//!
//! Two backends implement the seam: [`memory::InMemoryLedger`] carries the
//! full contract semantics in process (development and tests), and
//! [`http::HttpGateway`] forwards transactions to a REST gateway described
//! by a connection profile.

pub mod contract;
pub mod error;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod wallet;

pub use contract::{tx, ContractClient, LedgerConnector};
pub use error::{LedgerError, LedgerResult};
pub use gateway::{GatewayRegistry, LedgerSession};
pub use http::{ConnectionProfile, HttpGateway};
pub use memory::InMemoryLedger;
pub use wallet::{FileWallet, WalletIdentity};
