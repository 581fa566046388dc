//! Registration, login and token verification.

use crate::credentials::{
    DoctorCredential, DoctorProfile, NewDoctor, NewPatient, PatientCredential, PatientProfile,
};
use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::store::CredentialStore;
use crate::token::TokenService;
use chrono::Utc;
use healthgate_types::{Claims, Role};
use std::sync::Arc;

/// Successful patient login: token plus sanitized profile.
#[derive(Debug, Clone)]
pub struct PatientLogin {
    pub token: String,
    pub patient: PatientProfile,
}

/// Successful doctor login.
#[derive(Debug, Clone)]
pub struct DoctorLogin {
    pub token: String,
    pub doctor: DoctorProfile,
}

/// Orchestrates the credential store and the token service.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Hash the password and persist the patient credential. The plaintext
    /// never reaches the store.
    pub async fn register_patient(&self, new: NewPatient) -> AuthResult<String> {
        let password_hash = password::hash(&new.password)?;
        let now = Utc::now();
        let patient_id = new.patient_id.clone();

        self.store
            .insert_patient(PatientCredential {
                patient_id: new.patient_id,
                name: new.name,
                date_of_birth: new.date_of_birth,
                phone: new.phone,
                aadhar_number: new.aadhar_number,
                password_hash,
                fingerprint_template_id: new.fingerprint_template_id,
                is_active: true,
                last_login: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(patient = %patient_id, "registered patient credential");
        Ok(patient_id)
    }

    /// Hash the password and persist the doctor credential.
    pub async fn register_doctor(&self, new: NewDoctor) -> AuthResult<String> {
        let password_hash = password::hash(&new.password)?;
        let now = Utc::now();
        let doctor_id = new.doctor_id.clone();

        self.store
            .insert_doctor(DoctorCredential {
                doctor_id: new.doctor_id,
                name: new.name,
                license_number: new.license_number,
                specialization: new.specialization,
                hospital_name: new.hospital_name,
                password_hash,
                is_verified: false,
                verified_at: None,
                is_active: true,
                last_login: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(doctor = %doctor_id, "registered doctor credential");
        Ok(doctor_id)
    }

    /// Patient password login. Absent identifier, inactive record and
    /// password mismatch all fail with the same error.
    pub async fn login_patient(&self, patient_id: &str, plain: &str) -> AuthResult<PatientLogin> {
        let record = self.store.find_patient(patient_id).await?;
        let valid = match &record {
            Some(patient) if patient.is_active => password::verify(plain, &patient.password_hash),
            _ => {
                // Unknown identifiers still pay for a verification.
                password::verify(plain, password::dummy_hash());
                false
            }
        };

        let Some(patient) = record.filter(|_| valid) else {
            return Err(AuthError::InvalidCredentials);
        };

        self.store
            .touch_patient_login(&patient.patient_id, Utc::now())
            .await?;
        let token = self.tokens.issue(&patient.patient_id, Role::Patient)?;

        tracing::info!(patient = %patient.patient_id, "patient logged in");
        Ok(PatientLogin {
            token,
            patient: PatientProfile::from(&patient),
        })
    }

    /// Doctor password login; same uniform failure as patient login.
    pub async fn login_doctor(&self, doctor_id: &str, plain: &str) -> AuthResult<DoctorLogin> {
        let record = self.store.find_doctor(doctor_id).await?;
        let valid = match &record {
            Some(doctor) if doctor.is_active => password::verify(plain, &doctor.password_hash),
            _ => {
                password::verify(plain, password::dummy_hash());
                false
            }
        };

        let Some(doctor) = record.filter(|_| valid) else {
            return Err(AuthError::InvalidCredentials);
        };

        self.store
            .touch_doctor_login(&doctor.doctor_id, Utc::now())
            .await?;
        let token = self.tokens.issue(&doctor.doctor_id, Role::Doctor)?;

        tracing::info!(doctor = %doctor.doctor_id, "doctor logged in");
        Ok(DoctorLogin {
            token,
            doctor: DoctorProfile::from(&doctor),
        })
    }

    /// Decode and verify a bearer token.
    pub fn verify_token(&self, token: &str) -> AuthResult<Claims> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCredentialStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryCredentialStore::new()),
            TokenService::new("test-secret-at-least-32-characters", 24),
        )
    }

    fn new_patient(id: &str, aadhar: &str) -> NewPatient {
        NewPatient {
            patient_id: id.to_string(),
            name: "Asha Rao".into(),
            date_of_birth: "2000-01-01".parse().unwrap(),
            phone: "555".into(),
            aadhar_number: aadhar.to_string(),
            password: "pw".into(),
            fingerprint_template_id: None,
        }
    }

    fn new_doctor(id: &str, license: &str) -> NewDoctor {
        NewDoctor {
            doctor_id: id.to_string(),
            name: "Dr. Mehta".into(),
            license_number: license.to_string(),
            specialization: "Cardiology".into(),
            hospital_name: "Apollo".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trips_claims() {
        let auth = service();
        auth.register_patient(new_patient("P1", "123456789012"))
            .await
            .unwrap();

        let login = auth.login_patient("P1", "pw").await.unwrap();
        assert_eq!(login.patient.patient_id, "P1");

        let claims = auth.verify_token(&login.token).unwrap();
        assert_eq!(claims.sub, "P1");
        assert_eq!(claims.role, Role::Patient);
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_plaintext() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let auth = AuthService::new(
            store.clone(),
            TokenService::new("test-secret-at-least-32-characters", 24),
        );

        auth.register_patient(new_patient("P1", "123456789012"))
            .await
            .unwrap();

        let stored = store.find_patient("P1").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn duplicate_registration_fails() {
        let auth = service();
        auth.register_patient(new_patient("P1", "123456789012"))
            .await
            .unwrap();

        let err = auth
            .register_patient(new_patient("P2", "123456789012"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Duplicate(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_id_fail_identically() {
        let auth = service();
        auth.register_patient(new_patient("P1", "123456789012"))
            .await
            .unwrap();

        let wrong_password = auth.login_patient("P1", "nope").await.unwrap_err();
        let unknown_id = auth.login_patient("P404", "pw").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_id, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_id.to_string());
    }

    #[tokio::test]
    async fn login_stamps_last_login() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let auth = AuthService::new(
            store.clone(),
            TokenService::new("test-secret-at-least-32-characters", 24),
        );

        auth.register_patient(new_patient("P1", "123456789012"))
            .await
            .unwrap();
        assert!(store.find_patient("P1").await.unwrap().unwrap().last_login.is_none());

        auth.login_patient("P1", "pw").await.unwrap();
        assert!(store.find_patient("P1").await.unwrap().unwrap().last_login.is_some());
    }

    #[tokio::test]
    async fn doctor_login_carries_doctor_role() {
        let auth = service();
        auth.register_doctor(new_doctor("D1", "LIC-1")).await.unwrap();

        let login = auth.login_doctor("D1", "pw").await.unwrap();
        let claims = auth.verify_token(&login.token).unwrap();
        assert_eq!(claims.role, Role::Doctor);
        assert!(!login.doctor.is_verified);
    }
}
