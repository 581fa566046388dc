//! Application state for API handlers.

use healthgate_auth::AuthService;
use healthgate_ledger::GatewayRegistry;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Auth service (credential store + tokens)
    pub auth: Arc<AuthService>,

    /// Ledger session registry
    pub ledger: Arc<GatewayRegistry>,

    /// Identity label for administrative ledger calls
    pub admin_label: String,

    /// Identity label for doctor verification
    pub audit_label: String,

    /// Service version
    pub version: String,

    /// Service start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        ledger: Arc<GatewayRegistry>,
        admin_label: impl Into<String>,
        audit_label: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            ledger,
            admin_label: admin_label.into(),
            audit_label: audit_label.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string.
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}
