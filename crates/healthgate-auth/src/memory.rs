//! In-memory credential store for development and tests.

use crate::credentials::{DoctorCredential, PatientCredential};
use crate::error::{StoreError, StoreResult};
use crate::store::CredentialStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Credential store backed by `RwLock`ed maps; uniqueness checks are
/// explicit scans.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    patients: RwLock<HashMap<String, PatientCredential>>,
    doctors: RwLock<HashMap<String, DoctorCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert_patient(&self, patient: PatientCredential) -> StoreResult<()> {
        let mut patients = self.patients.write().await;
        if patients.contains_key(&patient.patient_id) {
            return Err(StoreError::Duplicate(patient.patient_id));
        }
        if patients
            .values()
            .any(|existing| existing.aadhar_number == patient.aadhar_number)
        {
            return Err(StoreError::Duplicate(patient.aadhar_number));
        }
        patients.insert(patient.patient_id.clone(), patient);
        Ok(())
    }

    async fn find_patient(&self, patient_id: &str) -> StoreResult<Option<PatientCredential>> {
        Ok(self.patients.read().await.get(patient_id).cloned())
    }

    async fn touch_patient_login(&self, patient_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        let mut patients = self.patients.write().await;
        if let Some(patient) = patients.get_mut(patient_id) {
            patient.last_login = Some(at);
            patient.updated_at = at;
        }
        Ok(())
    }

    async fn insert_doctor(&self, doctor: DoctorCredential) -> StoreResult<()> {
        let mut doctors = self.doctors.write().await;
        if doctors.contains_key(&doctor.doctor_id) {
            return Err(StoreError::Duplicate(doctor.doctor_id));
        }
        if doctors
            .values()
            .any(|existing| existing.license_number == doctor.license_number)
        {
            return Err(StoreError::Duplicate(doctor.license_number));
        }
        doctors.insert(doctor.doctor_id.clone(), doctor);
        Ok(())
    }

    async fn find_doctor(&self, doctor_id: &str) -> StoreResult<Option<DoctorCredential>> {
        Ok(self.doctors.read().await.get(doctor_id).cloned())
    }

    async fn touch_doctor_login(&self, doctor_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        let mut doctors = self.doctors.write().await;
        if let Some(doctor) = doctors.get_mut(doctor_id) {
            doctor.last_login = Some(at);
            doctor.updated_at = at;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: &str, aadhar: &str) -> PatientCredential {
        let now = Utc::now();
        PatientCredential {
            patient_id: id.to_string(),
            name: "Asha Rao".into(),
            date_of_birth: "2000-01-01".parse().unwrap(),
            phone: "555".into(),
            aadhar_number: aadhar.to_string(),
            password_hash: "$argon2id$stub".into(),
            fingerprint_template_id: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_patient_id_leaves_no_record() {
        let store = InMemoryCredentialStore::new();
        store.insert_patient(patient("P1", "111122223333")).await.unwrap();

        let err = store
            .insert_patient(patient("P1", "999988887777"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let stored = store.find_patient("P1").await.unwrap().unwrap();
        assert_eq!(stored.aadhar_number, "111122223333");
    }

    #[tokio::test]
    async fn duplicate_aadhar_is_rejected_across_patients() {
        let store = InMemoryCredentialStore::new();
        store.insert_patient(patient("P1", "111122223333")).await.unwrap();

        let err = store
            .insert_patient(patient("P2", "111122223333"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(key) if key == "111122223333"));
        assert!(store.find_patient("P2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_login_stamps_timestamps() {
        let store = InMemoryCredentialStore::new();
        store.insert_patient(patient("P1", "111122223333")).await.unwrap();

        let at = Utc::now();
        store.touch_patient_login("P1", at).await.unwrap();

        let stored = store.find_patient("P1").await.unwrap().unwrap();
        assert_eq!(stored.last_login, Some(at));
        assert_eq!(stored.updated_at, at);
    }
}
