//! Request handlers.

mod access;
mod auth;
mod doctor;
mod health;
mod patient;

pub use access::{check_access, grant_access, patient_accesses, revoke_access, verify_doctor};
pub use auth::{login_doctor, login_patient};
pub use doctor::{get_doctor, register_doctor};
pub use health::health_check;
pub use patient::{get_patient, register_patient};

use crate::error::{ApiError, ApiResult};

/// Reject empty required fields with a client error naming the field.
fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("missing field: {field}")));
    }
    Ok(())
}
