//! Doctor registration and lookup handlers.

use super::require;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use healthgate_auth::NewDoctor;
use healthgate_ledger::tx;
use healthgate_types::DoctorRecord;
use serde::{Deserialize, Serialize};

/// Register doctor request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorRequest {
    #[serde(rename = "doctorID", default)]
    pub doctor_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub password: String,
}

/// Register doctor response.
#[derive(Debug, Serialize)]
pub struct RegisterDoctorResponse {
    pub success: bool,
    #[serde(rename = "doctorID")]
    pub doctor_id: String,
}

/// Create a doctor on the ledger and store the login credential. Ledger
/// first, credential second; no compensation between the two.
pub async fn register_doctor(
    State(state): State<AppState>,
    Json(request): Json<RegisterDoctorRequest>,
) -> ApiResult<(StatusCode, Json<RegisterDoctorResponse>)> {
    require(&request.doctor_id, "doctorID")?;
    require(&request.name, "name")?;
    require(&request.license_number, "licenseNumber")?;
    require(&request.specialization, "specialization")?;
    require(&request.hospital_name, "hospitalName")?;
    require(&request.password, "password")?;

    let session = state.ledger.acquire(&state.admin_label).await?;
    session
        .submit(
            tx::REGISTER_DOCTOR,
            &[
                request.doctor_id.clone(),
                request.name.clone(),
                request.license_number.clone(),
                request.specialization.clone(),
                request.hospital_name.clone(),
            ],
        )
        .await?;

    state
        .auth
        .register_doctor(NewDoctor {
            doctor_id: request.doctor_id.clone(),
            name: request.name,
            license_number: request.license_number,
            specialization: request.specialization,
            hospital_name: request.hospital_name,
            password: request.password,
        })
        .await?;

    tracing::info!(doctor = %request.doctor_id, "registered doctor");

    Ok((
        StatusCode::CREATED,
        Json(RegisterDoctorResponse {
            success: true,
            doctor_id: request.doctor_id,
        }),
    ))
}

/// Fetch a doctor record from the ledger.
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Json<DoctorRecord>> {
    let session = state.ledger.acquire(&state.admin_label).await?;
    let bytes = session.evaluate(tx::GET_DOCTOR, &[doctor_id]).await?;

    let record: DoctorRecord = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Internal(format!("malformed ledger record: {e}")))?;
    Ok(Json(record))
}
