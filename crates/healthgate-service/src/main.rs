//! Healthgate - healthcare records gateway.
//!
//! Bridges an HTTP API to a permissioned ledger network (patient/doctor
//! records, access grants) and a relational credential store (password
//! login, session tokens).

use clap::Parser;
use healthgate_service::{GatewayConfig, GatewayError, GatewayResult, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Healthgate CLI.
#[derive(Parser)]
#[command(name = "healthgated")]
#[command(about = "Healthgate - healthcare records gateway", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HEALTHGATE_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "HEALTHGATE_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "HEALTHGATE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "HEALTHGATE_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> GatewayResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = GatewayConfig::load(cli.config.as_deref())
        .map_err(|e| GatewayError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| GatewayError::Config(format!("Invalid listen address: {e}")))?;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        channel = %config.ledger.channel,
        chaincode = %config.ledger.chaincode,
        "starting healthgate"
    );

    // Create and run server
    let server = Server::bootstrap(config).await?;
    server.run().await
}
