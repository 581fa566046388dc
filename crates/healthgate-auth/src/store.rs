//! Credential-store trait.

use crate::credentials::{DoctorCredential, PatientCredential};
use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence seam for patient and doctor credentials.
///
/// Inserts fail with [`crate::StoreError::Duplicate`] when any unique key
/// collides (patient: identifier or aadhar number; doctor: identifier or
/// license number) and must leave no record behind.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert_patient(&self, patient: PatientCredential) -> StoreResult<()>;

    async fn find_patient(&self, patient_id: &str) -> StoreResult<Option<PatientCredential>>;

    /// Stamp a successful patient login.
    async fn touch_patient_login(&self, patient_id: &str, at: DateTime<Utc>) -> StoreResult<()>;

    async fn insert_doctor(&self, doctor: DoctorCredential) -> StoreResult<()>;

    async fn find_doctor(&self, doctor_id: &str) -> StoreResult<Option<DoctorCredential>>;

    /// Stamp a successful doctor login.
    async fn touch_doctor_login(&self, doctor_id: &str, at: DateTime<Utc>) -> StoreResult<()>;
}
