//! Patient registration and lookup handlers.
//!
//! Registration touches both stores: the ledger transaction runs first,
//! then the credential insert. The two are not transactionally coupled —
//! a credential failure leaves the ledger record in place.

use super::require;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use healthgate_auth::NewPatient;
use healthgate_ledger::tx;
use healthgate_types::PatientRecord;
use serde::{Deserialize, Serialize};

/// Register patient request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatientRequest {
    #[serde(rename = "patientID", default)]
    pub patient_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub aadhar_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "fingerprintTemplateID", default)]
    pub fingerprint_template_id: Option<i32>,
}

/// Register patient response.
#[derive(Debug, Serialize)]
pub struct RegisterPatientResponse {
    pub success: bool,
    #[serde(rename = "patientID")]
    pub patient_id: String,
}

/// Create a patient on the ledger and store the login credential.
pub async fn register_patient(
    State(state): State<AppState>,
    Json(request): Json<RegisterPatientRequest>,
) -> ApiResult<(StatusCode, Json<RegisterPatientResponse>)> {
    require(&request.patient_id, "patientID")?;
    require(&request.name, "name")?;
    require(&request.date_of_birth, "dateOfBirth")?;
    require(&request.phone, "phone")?;
    require(&request.aadhar_number, "aadharNumber")?;
    require(&request.password, "password")?;

    let date_of_birth: chrono::NaiveDate = request
        .date_of_birth
        .parse()
        .map_err(|_| ApiError::Validation("dateOfBirth must be YYYY-MM-DD".into()))?;

    let session = state.ledger.acquire(&state.admin_label).await?;
    session
        .submit(
            tx::REGISTER_PATIENT,
            &[
                request.patient_id.clone(),
                request.name.clone(),
                request.date_of_birth.clone(),
                request.phone.clone(),
                request.aadhar_number.clone(),
                request.fingerprint_template_id.unwrap_or(0).to_string(),
            ],
        )
        .await?;

    // Second store; failures here leave an orphaned ledger record.
    state
        .auth
        .register_patient(NewPatient {
            patient_id: request.patient_id.clone(),
            name: request.name,
            date_of_birth,
            phone: request.phone,
            aadhar_number: request.aadhar_number,
            password: request.password,
            fingerprint_template_id: request.fingerprint_template_id,
        })
        .await?;

    tracing::info!(patient = %request.patient_id, "registered patient");

    Ok((
        StatusCode::CREATED,
        Json(RegisterPatientResponse {
            success: true,
            patient_id: request.patient_id,
        }),
    ))
}

/// Fetch a patient record from the ledger.
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<PatientRecord>> {
    let session = state.ledger.acquire(&state.admin_label).await?;
    let bytes = session
        .evaluate(tx::GET_PATIENT, &[patient_id])
        .await?;

    let record: PatientRecord = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Internal(format!("malformed ledger record: {e}")))?;
    Ok(Json(record))
}
