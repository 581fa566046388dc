//! In-memory ledger backend.
//!
//! Carries the healthcare contract's semantics in process: duplicate and
//! existence checks, the audit-MSP gate on doctor verification, access
//! grant lifecycle and the audit trail. Used for development profiles and
//! tests; the REST backend in [`crate::http`] replaces it against a real
//! network.

use crate::contract::{tx, ContractClient, LedgerConnector};
use crate::error::{LedgerError, LedgerResult};
use crate::wallet::WalletIdentity;
use async_trait::async_trait;
use chrono::Utc;
use healthgate_types::{AccessGrant, AccessValidity, AuditEntry, DoctorRecord, PatientRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct LedgerState {
    patients: HashMap<String, PatientRecord>,
    doctors: HashMap<String, DoctorRecord>,
    accesses: HashMap<String, AccessGrant>,
    audit: Vec<AuditEntry>,
}

impl LedgerState {
    fn append_audit(&mut self, patient_id: &str, doctor_id: &str, action: &str, details: String, msp: &str) {
        self.audit.push(AuditEntry {
            log_id: format!("audit:{}", Uuid::new_v4()),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            action: action.to_string(),
            details,
            timestamp: Utc::now().timestamp(),
            org_msp: msp.to_string(),
        });
    }
}

/// Shared in-process ledger. Every contract handle connected through it
/// sees the same world state.
pub struct InMemoryLedger {
    audit_msp: String,
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    /// `audit_msp` is the only MSP allowed to run `VerifyDoctor`.
    pub fn new(audit_msp: impl Into<String>) -> Self {
        Self {
            audit_msp: audit_msp.into(),
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Snapshot of the audit trail, oldest first.
    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.state.read().await.audit.clone()
    }
}

#[async_trait]
impl LedgerConnector for InMemoryLedger {
    async fn connect(
        &self,
        identity: &WalletIdentity,
        _channel: &str,
        _chaincode: &str,
    ) -> LedgerResult<Arc<dyn ContractClient>> {
        Ok(Arc::new(InMemoryContract {
            msp_id: identity.msp_id.clone(),
            audit_msp: self.audit_msp.clone(),
            state: self.state.clone(),
        }))
    }
}

struct InMemoryContract {
    msp_id: String,
    audit_msp: String,
    state: Arc<RwLock<LedgerState>>,
}

fn arg<'a>(args: &'a [String], index: usize, transaction: &str) -> LedgerResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| LedgerError::Contract(format!("{transaction}: missing argument {index}")))
}

fn int_arg(args: &[String], index: usize, transaction: &str) -> LedgerResult<i64> {
    arg(args, index, transaction)?
        .parse()
        .map_err(|_| LedgerError::Contract(format!("{transaction}: argument {index} is not an integer")))
}

#[async_trait]
impl ContractClient for InMemoryContract {
    async fn submit(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        match transaction {
            tx::REGISTER_PATIENT => self.register_patient(args).await,
            tx::REGISTER_DOCTOR => self.register_doctor(args).await,
            tx::VERIFY_DOCTOR => self.verify_doctor(args).await,
            tx::GRANT_ACCESS => self.grant_access(args).await,
            tx::REVOKE_ACCESS => self.revoke_access(args).await,
            other => Err(LedgerError::Contract(format!(
                "unknown submit transaction: {other}"
            ))),
        }
    }

    async fn evaluate(&self, transaction: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        match transaction {
            tx::GET_PATIENT => self.get_patient(args).await,
            tx::GET_DOCTOR => self.get_doctor(args).await,
            tx::CHECK_ACCESS_VALIDITY => self.check_access_validity(args).await,
            tx::GET_ACTIVE_ACCESSES_FOR_PATIENT => self.active_accesses_for_patient(args).await,
            other => Err(LedgerError::Contract(format!(
                "unknown evaluate transaction: {other}"
            ))),
        }
    }
}

impl InMemoryContract {
    async fn register_patient(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let patient_id = arg(args, 0, tx::REGISTER_PATIENT)?;
        let name = arg(args, 1, tx::REGISTER_PATIENT)?;
        let date_of_birth = arg(args, 2, tx::REGISTER_PATIENT)?;
        let phone = arg(args, 3, tx::REGISTER_PATIENT)?;
        let aadhar_number = arg(args, 4, tx::REGISTER_PATIENT)?;
        let fingerprint_template_id = int_arg(args, 5, tx::REGISTER_PATIENT)? as i32;

        if patient_id.is_empty() || name.is_empty() || aadhar_number.len() != 12 {
            return Err(LedgerError::Contract("invalid patient details".into()));
        }

        let mut state = self.state.write().await;
        if state.patients.contains_key(patient_id) {
            return Err(LedgerError::Duplicate(format!("patient {patient_id}")));
        }

        state.patients.insert(
            patient_id.to_string(),
            PatientRecord {
                patient_id: patient_id.to_string(),
                name: name.to_string(),
                date_of_birth: date_of_birth.to_string(),
                phone: phone.to_string(),
                aadhar_number: aadhar_number.to_string(),
                fingerprint_template_id,
                registered_at: Utc::now().timestamp(),
                registered_by_org: self.msp_id.clone(),
            },
        );
        state.append_audit(
            patient_id,
            "",
            "REGISTER_PATIENT",
            format!("patient registered by {}", self.msp_id),
            &self.msp_id,
        );
        Ok(Vec::new())
    }

    async fn get_patient(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let patient_id = arg(args, 0, tx::GET_PATIENT)?;
        let state = self.state.read().await;
        let patient = state
            .patients
            .get(patient_id)
            .ok_or_else(|| LedgerError::NotFound(format!("patient {patient_id}")))?;
        Ok(serde_json::to_vec(patient)?)
    }

    async fn register_doctor(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let doctor_id = arg(args, 0, tx::REGISTER_DOCTOR)?;
        let name = arg(args, 1, tx::REGISTER_DOCTOR)?;
        let license_number = arg(args, 2, tx::REGISTER_DOCTOR)?;
        let specialization = arg(args, 3, tx::REGISTER_DOCTOR)?;
        let hospital_name = arg(args, 4, tx::REGISTER_DOCTOR)?;

        if doctor_id.is_empty() || name.is_empty() || license_number.is_empty() {
            return Err(LedgerError::Contract("invalid doctor details".into()));
        }

        let mut state = self.state.write().await;
        if state.doctors.contains_key(doctor_id) {
            return Err(LedgerError::Duplicate(format!("doctor {doctor_id}")));
        }

        state.doctors.insert(
            doctor_id.to_string(),
            DoctorRecord {
                doctor_id: doctor_id.to_string(),
                name: name.to_string(),
                license_number: license_number.to_string(),
                specialization: specialization.to_string(),
                hospital_name: hospital_name.to_string(),
                verified: false,
                registered_at: Utc::now().timestamp(),
                registered_by_org: self.msp_id.clone(),
            },
        );
        state.append_audit(
            "",
            doctor_id,
            "REGISTER_DOCTOR",
            format!("doctor registered by {}", self.msp_id),
            &self.msp_id,
        );
        Ok(Vec::new())
    }

    async fn get_doctor(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let doctor_id = arg(args, 0, tx::GET_DOCTOR)?;
        let state = self.state.read().await;
        let doctor = state
            .doctors
            .get(doctor_id)
            .ok_or_else(|| LedgerError::NotFound(format!("doctor {doctor_id}")))?;
        Ok(serde_json::to_vec(doctor)?)
    }

    async fn verify_doctor(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let doctor_id = arg(args, 0, tx::VERIFY_DOCTOR)?;

        if self.msp_id != self.audit_msp {
            return Err(LedgerError::PermissionDenied(format!(
                "only {} can verify doctors",
                self.audit_msp
            )));
        }

        let mut state = self.state.write().await;
        let doctor = state
            .doctors
            .get_mut(doctor_id)
            .ok_or_else(|| LedgerError::NotFound(format!("doctor {doctor_id}")))?;
        doctor.verified = true;
        state.append_audit(
            "",
            doctor_id,
            "VERIFY_DOCTOR",
            "doctor verified by audit org".into(),
            &self.msp_id,
        );
        Ok(Vec::new())
    }

    async fn grant_access(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let patient_id = arg(args, 0, tx::GRANT_ACCESS)?;
        let doctor_id = arg(args, 1, tx::GRANT_ACCESS)?;
        let duration_hours = int_arg(args, 2, tx::GRANT_ACCESS)?;
        let purpose = arg(args, 3, tx::GRANT_ACCESS)?;

        let mut state = self.state.write().await;
        if !state.patients.contains_key(patient_id) {
            return Err(LedgerError::NotFound(format!("patient {patient_id}")));
        }
        let doctor = state
            .doctors
            .get(doctor_id)
            .ok_or_else(|| LedgerError::NotFound(format!("doctor {doctor_id}")))?;
        if !doctor.verified {
            return Err(LedgerError::PermissionDenied(format!(
                "doctor {doctor_id} is not verified"
            )));
        }

        let granted_at = Utc::now().timestamp();
        let access_key = AccessGrant::key_for(patient_id, doctor_id, granted_at);
        let grant = AccessGrant {
            access_key: access_key.clone(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            granted_at,
            expiry_time: granted_at + duration_hours * 3600,
            duration_hours,
            purpose: purpose.to_string(),
            revoked: false,
            revoked_at: 0,
            granted_by_org: self.msp_id.clone(),
        };
        state.accesses.insert(access_key.clone(), grant);
        state.append_audit(
            patient_id,
            doctor_id,
            "GRANT_ACCESS",
            format!("access granted for {duration_hours} hours: {purpose}"),
            &self.msp_id,
        );
        Ok(access_key.into_bytes())
    }

    async fn revoke_access(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let access_key = arg(args, 0, tx::REVOKE_ACCESS)?;

        let mut state = self.state.write().await;
        let grant = state
            .accesses
            .get_mut(access_key)
            .ok_or_else(|| LedgerError::NotFound(format!("access key {access_key}")))?;
        if grant.revoked {
            return Err(LedgerError::Contract("access already revoked".into()));
        }
        grant.revoked = true;
        grant.revoked_at = Utc::now().timestamp();
        let (patient_id, doctor_id) = (grant.patient_id.clone(), grant.doctor_id.clone());
        state.append_audit(
            &patient_id,
            &doctor_id,
            "REVOKE_ACCESS",
            "access manually revoked".into(),
            &self.msp_id,
        );
        Ok(Vec::new())
    }

    async fn check_access_validity(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let access_key = arg(args, 0, tx::CHECK_ACCESS_VALIDITY)?;
        let state = self.state.read().await;

        let validity = match state.accesses.get(access_key) {
            None => AccessValidity::invalid("access key not found"),
            Some(grant) if grant.revoked => AccessValidity {
                revoked_at: Some(grant.revoked_at),
                ..AccessValidity::invalid("access revoked")
            },
            Some(grant) => {
                let now = Utc::now().timestamp();
                if now > grant.expiry_time {
                    AccessValidity {
                        expired_at: Some(grant.expiry_time),
                        ..AccessValidity::invalid("access expired")
                    }
                } else {
                    AccessValidity {
                        valid: true,
                        reason: None,
                        patient_id: Some(grant.patient_id.clone()),
                        doctor_id: Some(grant.doctor_id.clone()),
                        expires_in: Some(grant.expiry_time - now),
                        revoked_at: None,
                        expired_at: None,
                    }
                }
            }
        };
        Ok(serde_json::to_vec(&validity)?)
    }

    async fn active_accesses_for_patient(&self, args: &[String]) -> LedgerResult<Vec<u8>> {
        let patient_id = arg(args, 0, tx::GET_ACTIVE_ACCESSES_FOR_PATIENT)?;
        let state = self.state.read().await;
        let now = Utc::now().timestamp();

        let mut active: Vec<&AccessGrant> = state
            .accesses
            .values()
            .filter(|grant| grant.patient_id == patient_id && grant.is_valid_at(now))
            .collect();
        active.sort_by_key(|grant| grant.granted_at);
        Ok(serde_json::to_vec(&active)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_MSP: &str = "HospitalApolloMSP";
    const AUDIT_MSP: &str = "AuditOrgMSP";

    async fn connect(ledger: &InMemoryLedger, msp: &str) -> Arc<dyn ContractClient> {
        ledger
            .connect(
                &WalletIdentity::new("cert", "key", msp),
                "healthchannel",
                "healthcare",
            )
            .await
            .unwrap()
    }

    fn patient_args(id: &str, aadhar: &str) -> Vec<String> {
        vec![
            id.into(),
            "Asha Rao".into(),
            "2000-01-01".into(),
            "555".into(),
            aadhar.into(),
            "0".into(),
        ]
    }

    fn doctor_args(id: &str, license: &str) -> Vec<String> {
        vec![
            id.into(),
            "Dr. Mehta".into(),
            license.into(),
            "Cardiology".into(),
            "Apollo".into(),
        ]
    }

    #[tokio::test]
    async fn register_and_get_patient() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let contract = connect(&ledger, ADMIN_MSP).await;

        contract
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "123456789012"))
            .await
            .unwrap();

        let bytes = contract
            .evaluate(tx::GET_PATIENT, &["P1".to_string()])
            .await
            .unwrap();
        let record: PatientRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(record.patient_id, "P1");
        assert_eq!(record.registered_by_org, ADMIN_MSP);

        assert_eq!(ledger.audit_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_patient_is_rejected() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let contract = connect(&ledger, ADMIN_MSP).await;

        contract
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "123456789012"))
            .await
            .unwrap();
        let err = contract
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "999988887777"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate(_)));
    }

    #[tokio::test]
    async fn short_aadhar_is_invalid() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let contract = connect(&ledger, ADMIN_MSP).await;

        let err = contract
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Contract(_)));
    }

    #[tokio::test]
    async fn unknown_doctor_is_not_found() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let contract = connect(&ledger, ADMIN_MSP).await;

        let err = contract
            .evaluate(tx::GET_DOCTOR, &["D404".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn verify_doctor_requires_audit_msp() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let admin = connect(&ledger, ADMIN_MSP).await;
        let audit = connect(&ledger, AUDIT_MSP).await;

        admin
            .submit(tx::REGISTER_DOCTOR, &doctor_args("D1", "LIC-1"))
            .await
            .unwrap();

        let err = admin
            .submit(tx::VERIFY_DOCTOR, &["D1".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PermissionDenied(_)));

        audit
            .submit(tx::VERIFY_DOCTOR, &["D1".to_string()])
            .await
            .unwrap();
        // Verifying twice is a repeat success, never a revert.
        audit
            .submit(tx::VERIFY_DOCTOR, &["D1".to_string()])
            .await
            .unwrap();

        let bytes = admin
            .evaluate(tx::GET_DOCTOR, &["D1".to_string()])
            .await
            .unwrap();
        let record: DoctorRecord = serde_json::from_slice(&bytes).unwrap();
        assert!(record.verified);
    }

    #[tokio::test]
    async fn grant_requires_verified_doctor() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let admin = connect(&ledger, ADMIN_MSP).await;

        admin
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "123456789012"))
            .await
            .unwrap();
        admin
            .submit(tx::REGISTER_DOCTOR, &doctor_args("D1", "LIC-1"))
            .await
            .unwrap();

        let err = admin
            .submit(
                tx::GRANT_ACCESS,
                &["P1".into(), "D1".into(), "2".into(), "checkup".into()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn grant_revoke_check_lifecycle() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let admin = connect(&ledger, ADMIN_MSP).await;
        let audit = connect(&ledger, AUDIT_MSP).await;

        admin
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "123456789012"))
            .await
            .unwrap();
        admin
            .submit(tx::REGISTER_DOCTOR, &doctor_args("D1", "LIC-1"))
            .await
            .unwrap();
        audit
            .submit(tx::VERIFY_DOCTOR, &["D1".to_string()])
            .await
            .unwrap();

        let key_bytes = admin
            .submit(
                tx::GRANT_ACCESS,
                &["P1".into(), "D1".into(), "2".into(), "checkup".into()],
            )
            .await
            .unwrap();
        let access_key = String::from_utf8(key_bytes).unwrap();

        let bytes = admin
            .evaluate(tx::CHECK_ACCESS_VALIDITY, &[access_key.clone()])
            .await
            .unwrap();
        let validity: AccessValidity = serde_json::from_slice(&bytes).unwrap();
        assert!(validity.valid);
        assert_eq!(validity.doctor_id.as_deref(), Some("D1"));

        let bytes = admin
            .evaluate(tx::GET_ACTIVE_ACCESSES_FOR_PATIENT, &["P1".to_string()])
            .await
            .unwrap();
        let active: Vec<AccessGrant> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(active.len(), 1);

        admin
            .submit(tx::REVOKE_ACCESS, &[access_key.clone()])
            .await
            .unwrap();
        let err = admin
            .submit(tx::REVOKE_ACCESS, &[access_key.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Contract(_)));

        let bytes = admin
            .evaluate(tx::CHECK_ACCESS_VALIDITY, &[access_key])
            .await
            .unwrap();
        let validity: AccessValidity = serde_json::from_slice(&bytes).unwrap();
        assert!(!validity.valid);
        assert_eq!(validity.reason.as_deref(), Some("access revoked"));
    }

    #[tokio::test]
    async fn expired_grant_is_invalid_and_not_listed() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let admin = connect(&ledger, ADMIN_MSP).await;
        let audit = connect(&ledger, AUDIT_MSP).await;

        admin
            .submit(tx::REGISTER_PATIENT, &patient_args("P1", "123456789012"))
            .await
            .unwrap();
        admin
            .submit(tx::REGISTER_DOCTOR, &doctor_args("D1", "LIC-1"))
            .await
            .unwrap();
        audit
            .submit(tx::VERIFY_DOCTOR, &["D1".to_string()])
            .await
            .unwrap();

        // A negative duration puts the expiry in the past.
        let key_bytes = admin
            .submit(
                tx::GRANT_ACCESS,
                &["P1".into(), "D1".into(), "-1".into(), "stale".into()],
            )
            .await
            .unwrap();
        let access_key = String::from_utf8(key_bytes).unwrap();

        let bytes = admin
            .evaluate(tx::CHECK_ACCESS_VALIDITY, &[access_key])
            .await
            .unwrap();
        let validity: AccessValidity = serde_json::from_slice(&bytes).unwrap();
        assert!(!validity.valid);
        assert_eq!(validity.reason.as_deref(), Some("access expired"));

        let bytes = admin
            .evaluate(tx::GET_ACTIVE_ACCESSES_FOR_PATIENT, &["P1".to_string()])
            .await
            .unwrap();
        let active: Vec<AccessGrant> = serde_json::from_slice(&bytes).unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn unknown_access_key_is_reported_not_errored() {
        let ledger = InMemoryLedger::new(AUDIT_MSP);
        let contract = connect(&ledger, ADMIN_MSP).await;

        let bytes = contract
            .evaluate(tx::CHECK_ACCESS_VALIDITY, &["access:x:y:0".to_string()])
            .await
            .unwrap();
        let validity: AccessValidity = serde_json::from_slice(&bytes).unwrap();
        assert!(!validity.valid);
        assert_eq!(validity.reason.as_deref(), Some("access key not found"));
    }
}
