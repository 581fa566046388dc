//! Ledger record types.
//!
//! Field names follow the chaincode contract exactly (`patientID`,
//! `aadharNumber`, ...); timestamps are unix seconds as written by the
//! contract's transaction clock.

use serde::{Deserialize, Serialize};

/// A patient as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(rename = "patientID")]
    pub patient_id: String,
    pub name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub aadhar_number: String,
    #[serde(rename = "fingerprintTemplateID")]
    pub fingerprint_template_id: i32,
    pub registered_at: i64,
    pub registered_by_org: String,
}

/// A doctor as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    #[serde(rename = "doctorID")]
    pub doctor_id: String,
    pub name: String,
    pub license_number: String,
    pub specialization: String,
    pub hospital_name: String,
    pub verified: bool,
    pub registered_at: i64,
    pub registered_by_org: String,
}

/// A time-bound access grant from a patient to a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub access_key: String,
    #[serde(rename = "patientID")]
    pub patient_id: String,
    #[serde(rename = "doctorID")]
    pub doctor_id: String,
    pub granted_at: i64,
    pub expiry_time: i64,
    pub duration_hours: i64,
    pub purpose: String,
    pub revoked: bool,
    pub revoked_at: i64,
    pub granted_by_org: String,
}

impl AccessGrant {
    /// Access keys are `access:{patientID}:{doctorID}:{grantedAt}`.
    pub fn key_for(patient_id: &str, doctor_id: &str, granted_at: i64) -> String {
        format!("access:{}:{}:{}", patient_id, doctor_id, granted_at)
    }

    /// Whether the grant is usable at `now` (unix seconds).
    pub fn is_valid_at(&self, now: i64) -> bool {
        !self.revoked && now <= self.expiry_time
    }
}

/// Result of a `CheckAccessValidity` evaluation. Invalid grants carry a
/// `reason`; valid grants carry the remaining lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessValidity {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "patientID", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(rename = "doctorID", skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,
}

impl AccessValidity {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            patient_id: None,
            doctor_id: None,
            expires_in: None,
            revoked_at: None,
            expired_at: None,
        }
    }
}

/// Audit trail entry appended by every state-changing transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    #[serde(rename = "logID")]
    pub log_id: String,
    #[serde(rename = "patientID")]
    pub patient_id: String,
    #[serde(rename = "doctorID")]
    pub doctor_id: String,
    pub action: String,
    pub details: String,
    pub timestamp: i64,
    pub org_msp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_record_uses_contract_field_names() {
        let record = PatientRecord {
            patient_id: "P1".into(),
            name: "A".into(),
            date_of_birth: "2000-01-01".into(),
            phone: "555".into(),
            aadhar_number: "123456789012".into(),
            fingerprint_template_id: 7,
            registered_at: 1700000000,
            registered_by_org: "HospitalApolloMSP".into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["patientID"], "P1");
        assert_eq!(json["aadharNumber"], "123456789012");
        assert_eq!(json["fingerprintTemplateID"], 7);
        assert_eq!(json["registeredByOrg"], "HospitalApolloMSP");
    }

    #[test]
    fn access_key_format_is_stable() {
        assert_eq!(
            AccessGrant::key_for("P1", "D1", 1700000000),
            "access:P1:D1:1700000000"
        );
    }

    #[test]
    fn grant_validity_window() {
        let grant = AccessGrant {
            access_key: "access:P1:D1:100".into(),
            patient_id: "P1".into(),
            doctor_id: "D1".into(),
            granted_at: 100,
            expiry_time: 200,
            duration_hours: 1,
            purpose: "checkup".into(),
            revoked: false,
            revoked_at: 0,
            granted_by_org: "HospitalApolloMSP".into(),
        };
        assert!(grant.is_valid_at(150));
        assert!(!grant.is_valid_at(201));

        let revoked = AccessGrant {
            revoked: true,
            revoked_at: 120,
            ..grant
        };
        assert!(!revoked.is_valid_at(150));
    }
}
