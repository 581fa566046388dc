//! Server setup and lifecycle management.

use crate::config::{DatabaseConfig, GatewayConfig, LedgerBackend};
use crate::error::{GatewayError, GatewayResult};
use crate::router::create_router;
use crate::state::AppState;
use healthgate_auth::{
    AuthService, CredentialStore, InMemoryCredentialStore, PostgresCredentialStore, TokenService,
};
use healthgate_ledger::{
    FileWallet, GatewayRegistry, HttpGateway, InMemoryLedger, LedgerConnector,
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Healthgate server.
pub struct Server {
    config: GatewayConfig,
    state: AppState,
}

impl Server {
    /// Wire up stores, ledger backend and auth service from configuration.
    pub async fn bootstrap(config: GatewayConfig) -> GatewayResult<Self> {
        let store: Arc<dyn CredentialStore> = match &config.database {
            DatabaseConfig::Memory => {
                tracing::info!("using in-memory credential store");
                Arc::new(InMemoryCredentialStore::new())
            }
            DatabaseConfig::Postgres {
                url,
                max_connections,
                connect_timeout_secs,
            } => {
                let store = PostgresCredentialStore::connect_with_options(
                    url,
                    *max_connections,
                    *connect_timeout_secs,
                )
                .await
                .map_err(|e| GatewayError::Store(e.to_string()))?;
                tracing::info!("connected postgres credential store");
                Arc::new(store)
            }
        };

        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
        let auth = Arc::new(AuthService::new(store, tokens));

        let wallet = FileWallet::open(&config.ledger.wallet_dir)?;
        let connector: Arc<dyn LedgerConnector> = match &config.ledger.backend {
            LedgerBackend::Memory { audit_msp } => {
                tracing::info!(audit_msp = %audit_msp, "using in-memory ledger backend");
                Arc::new(InMemoryLedger::new(audit_msp.clone()))
            }
            LedgerBackend::Http { profile_path } => {
                let gateway = HttpGateway::from_profile_path(Path::new(profile_path))?;
                tracing::info!(profile = %profile_path, "using http ledger gateway");
                Arc::new(gateway)
            }
        };

        let ledger = Arc::new(GatewayRegistry::new(
            wallet,
            connector,
            config.ledger.channel.clone(),
            config.ledger.chaincode.clone(),
        ));

        let state = AppState::new(
            auth,
            ledger,
            config.ledger.admin_label.clone(),
            config.ledger.audit_label.clone(),
        );

        Ok(Self { config, state })
    }

    /// State handle, for embedding the router in tests.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self) -> GatewayResult<()> {
        let addr = self.config.server.listen_addr;
        let app = create_router(self.state.clone());
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("healthgate listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;

        tracing::info!("healthgate shutting down");
        self.state.ledger.release_all().await;

        Ok(())
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
