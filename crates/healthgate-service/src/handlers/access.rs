//! Access-control handlers: doctor verification and patient access grants.

use super::require;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use healthgate_ledger::tx;
use healthgate_types::{AccessGrant, AccessValidity, Claims, Role};
use serde::{Deserialize, Serialize};

/// Verification response.
#[derive(Debug, Serialize)]
pub struct VerifyDoctorResponse {
    pub success: bool,
}

/// Flip a doctor's verified flag on the ledger. Runs under the audit
/// identity; the contract rejects any other MSP, so the privilege lives in
/// the ledger rather than this layer.
pub async fn verify_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Json<VerifyDoctorResponse>> {
    let session = state.ledger.acquire(&state.audit_label).await?;
    session.submit(tx::VERIFY_DOCTOR, &[doctor_id.clone()]).await?;

    tracing::info!(doctor = %doctor_id, "verified doctor");
    Ok(Json(VerifyDoctorResponse { success: true }))
}

/// Grant access request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessRequest {
    #[serde(rename = "patientID", default)]
    pub patient_id: String,
    #[serde(rename = "doctorID", default)]
    pub doctor_id: String,
    #[serde(default)]
    pub duration_hours: i64,
    #[serde(default)]
    pub purpose: String,
}

/// Grant access response.
#[derive(Debug, Serialize)]
pub struct GrantAccessResponse {
    #[serde(rename = "accessKey")]
    pub access_key: String,
}

/// Grant a doctor time-bound access to the calling patient's records.
pub async fn grant_access(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<GrantAccessRequest>,
) -> ApiResult<Json<GrantAccessResponse>> {
    require(&request.patient_id, "patientID")?;
    require(&request.doctor_id, "doctorID")?;
    require(&request.purpose, "purpose")?;
    if request.duration_hours <= 0 {
        return Err(ApiError::Validation("durationHours must be positive".into()));
    }

    if claims.role != Role::Patient || claims.sub != request.patient_id {
        return Err(ApiError::Forbidden(
            "only the granting patient may create this grant".into(),
        ));
    }

    let session = state.ledger.acquire(&state.admin_label).await?;
    let key_bytes = session
        .submit(
            tx::GRANT_ACCESS,
            &[
                request.patient_id.clone(),
                request.doctor_id.clone(),
                request.duration_hours.to_string(),
                request.purpose,
            ],
        )
        .await?;

    let access_key = String::from_utf8(key_bytes)
        .map_err(|e| ApiError::Internal(format!("malformed access key: {e}")))?;

    tracing::info!(
        patient = %request.patient_id,
        doctor = %request.doctor_id,
        hours = request.duration_hours,
        "granted access"
    );
    Ok(Json(GrantAccessResponse { access_key }))
}

/// Revoke access request.
#[derive(Debug, Deserialize)]
pub struct RevokeAccessRequest {
    #[serde(rename = "accessKey", default)]
    pub access_key: String,
}

/// Revoke access response.
#[derive(Debug, Serialize)]
pub struct RevokeAccessResponse {
    pub success: bool,
}

/// Revoke an access grant.
pub async fn revoke_access(
    State(state): State<AppState>,
    Json(request): Json<RevokeAccessRequest>,
) -> ApiResult<Json<RevokeAccessResponse>> {
    require(&request.access_key, "accessKey")?;

    let session = state.ledger.acquire(&state.admin_label).await?;
    session
        .submit(tx::REVOKE_ACCESS, &[request.access_key.clone()])
        .await?;

    tracing::info!(access_key = %request.access_key, "revoked access");
    Ok(Json(RevokeAccessResponse { success: true }))
}

/// Check whether an access grant is currently valid.
pub async fn check_access(
    State(state): State<AppState>,
    Path(access_key): Path<String>,
) -> ApiResult<Json<AccessValidity>> {
    let session = state.ledger.acquire(&state.admin_label).await?;
    let bytes = session
        .evaluate(tx::CHECK_ACCESS_VALIDITY, &[access_key])
        .await?;

    let validity: AccessValidity = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Internal(format!("malformed validity record: {e}")))?;
    Ok(Json(validity))
}

/// List a patient's active (unrevoked, unexpired) grants.
pub async fn patient_accesses(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<AccessGrant>>> {
    let session = state.ledger.acquire(&state.admin_label).await?;
    let bytes = session
        .evaluate(tx::GET_ACTIVE_ACCESSES_FOR_PATIENT, &[patient_id])
        .await?;

    let grants: Vec<AccessGrant> = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Internal(format!("malformed grant list: {e}")))?;
    Ok(Json(grants))
}
