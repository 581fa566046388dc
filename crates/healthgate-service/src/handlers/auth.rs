//! Password login handlers.

use super::require;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use healthgate_auth::{DoctorProfile, PatientProfile};
use serde::{Deserialize, Serialize};

/// Patient login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientLoginRequest {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub password: String,
}

/// Patient login response: token plus sanitized profile.
#[derive(Debug, Serialize)]
pub struct PatientLoginResponse {
    pub token: String,
    pub patient: PatientProfile,
}

/// Patient password login.
pub async fn login_patient(
    State(state): State<AppState>,
    Json(request): Json<PatientLoginRequest>,
) -> ApiResult<Json<PatientLoginResponse>> {
    require(&request.patient_id, "patientId")?;
    require(&request.password, "password")?;

    let login = state
        .auth
        .login_patient(&request.patient_id, &request.password)
        .await?;
    Ok(Json(PatientLoginResponse {
        token: login.token,
        patient: login.patient,
    }))
}

/// Doctor login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorLoginRequest {
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub password: String,
}

/// Doctor login response.
#[derive(Debug, Serialize)]
pub struct DoctorLoginResponse {
    pub token: String,
    pub doctor: DoctorProfile,
}

/// Doctor password login.
pub async fn login_doctor(
    State(state): State<AppState>,
    Json(request): Json<DoctorLoginRequest>,
) -> ApiResult<Json<DoctorLoginResponse>> {
    require(&request.doctor_id, "doctorId")?;
    require(&request.password, "password")?;

    let login = state
        .auth
        .login_doctor(&request.doctor_id, &request.password)
        .await?;
    Ok(Json(DoctorLoginResponse {
        token: login.token,
        doctor: login.doctor,
    }))
}
