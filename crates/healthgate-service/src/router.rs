//! API router configuration.

use crate::handlers;
use crate::middleware::require_auth;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Registration and login
        .route("/patient/register", post(handlers::register_patient))
        .route("/doctor/register", post(handlers::register_doctor))
        .route("/auth/login/patient", post(handlers::login_patient))
        .route("/auth/login/doctor", post(handlers::login_doctor))
        // Privilege comes from the audit identity's ledger MSP
        .route("/access/verify/:doctor_id", post(handlers::verify_doctor));

    let protected_routes = Router::new()
        .route("/patient/:patient_id", get(handlers::get_patient))
        .route("/doctor/:doctor_id", get(handlers::get_doctor))
        .route("/access/grant", post(handlers::grant_access))
        .route("/access/revoke", post(handlers::revoke_access))
        .route("/access/check/:access_key", get(handlers::check_access))
        .route("/access/patient/:patient_id", get(handlers::patient_accesses))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
