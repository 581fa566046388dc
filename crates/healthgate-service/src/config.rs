//! Configuration for the healthgate service.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Credential-store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Ledger network configuration
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Token-signing configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            ledger: LedgerConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".parse().unwrap(),
            enable_cors: true,
        }
    }
}

/// Credential-store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// In-memory store (for development/testing)
    Memory,

    /// PostgreSQL store
    Postgres {
        /// Connection URL
        url: String,

        /// Maximum connections in pool
        #[serde(default = "default_pool_size")]
        max_connections: u32,

        /// Connection timeout in seconds
        #[serde(default = "default_connection_timeout")]
        connect_timeout_secs: u64,
    },
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Memory
    }
}

/// Ledger network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Contract backend
    #[serde(default)]
    pub backend: LedgerBackend,

    /// Channel name
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Chaincode name
    #[serde(default = "default_chaincode")]
    pub chaincode: String,

    /// Identity wallet directory
    #[serde(default = "default_wallet_dir")]
    pub wallet_dir: String,

    /// Identity label used for administrative reads/writes
    #[serde(default = "default_admin_label")]
    pub admin_label: String,

    /// Identity label used for doctor verification
    #[serde(default = "default_audit_label")]
    pub audit_label: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            channel: default_channel(),
            chaincode: default_chaincode(),
            wallet_dir: default_wallet_dir(),
            admin_label: default_admin_label(),
            audit_label: default_audit_label(),
        }
    }
}

/// Contract backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LedgerBackend {
    /// In-process ledger (for development/testing)
    Memory {
        /// MSP allowed to verify doctors
        #[serde(default = "default_audit_msp")]
        audit_msp: String,
    },

    /// REST gateway fronting the network
    Http {
        /// Path to the connection-profile JSON file
        profile_path: String,
    },
}

impl Default for LedgerBackend {
    fn default() -> Self {
        LedgerBackend::Memory {
            audit_msp: default_audit_msp(),
        }
    }
}

/// Token-signing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_pool_size() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_channel() -> String {
    "healthchannel".to_string()
}

fn default_chaincode() -> String {
    "healthcare".to_string()
}

fn default_wallet_dir() -> String {
    "wallet".to_string()
}

fn default_admin_label() -> String {
    "admin".to_string()
}

fn default_audit_label() -> String {
    "auditOrgAdmin".to_string()
}

fn default_audit_msp() -> String {
    "AuditOrgMSP".to_string()
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GatewayConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `HEALTHGATE_*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&GatewayConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("HEALTHGATE")
                .separator("_")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_development_shaped() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.listen_addr.port(), 3000);
        assert!(matches!(config.database, DatabaseConfig::Memory));
        assert!(matches!(config.ledger.backend, LedgerBackend::Memory { .. }));
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[test]
    fn ledger_defaults_match_the_network() {
        let config = LedgerConfig::default();
        assert_eq!(config.channel, "healthchannel");
        assert_eq!(config.chaincode, "healthcare");
        assert_eq!(config.admin_label, "admin");
        assert_eq!(config.audit_label, "auditOrgAdmin");
    }
}
