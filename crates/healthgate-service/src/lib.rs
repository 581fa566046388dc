//! Healthgate HTTP service.
//!
//! Thin routing layer over the auth service and the ledger session
//! registry: handlers validate input, pick the right ledger identity,
//! run the transaction and map failures to HTTP statuses.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult, GatewayError, GatewayResult};
pub use router::create_router;
pub use server::Server;
pub use state::AppState;
