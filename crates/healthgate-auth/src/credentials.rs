//! Credential-store records and their API-facing projections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A patient row in the `patients` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientCredential {
    pub patient_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub aadhar_number: String,
    pub password_hash: String,
    pub fingerprint_template_id: Option<i32>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A doctor row in the `doctors` table.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorCredential {
    pub doctor_id: String,
    pub name: String,
    pub license_number: String,
    pub specialization: String,
    pub hospital_name: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input for a patient. `password` is plaintext here and
/// nowhere else.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub patient_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub aadhar_number: String,
    pub password: String,
    pub fingerprint_template_id: Option<i32>,
}

/// Registration input for a doctor.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub doctor_id: String,
    pub name: String,
    pub license_number: String,
    pub specialization: String,
    pub hospital_name: String,
    pub password: String,
}

/// Patient fields returned to callers after login — never the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub patient_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub aadhar_number: String,
}

impl From<&PatientCredential> for PatientProfile {
    fn from(record: &PatientCredential) -> Self {
        Self {
            patient_id: record.patient_id.clone(),
            name: record.name.clone(),
            date_of_birth: record.date_of_birth,
            phone: record.phone.clone(),
            aadhar_number: record.aadhar_number.clone(),
        }
    }
}

/// Doctor fields returned to callers after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub doctor_id: String,
    pub name: String,
    pub license_number: String,
    pub specialization: String,
    pub hospital_name: String,
    pub is_verified: bool,
}

impl From<&DoctorCredential> for DoctorProfile {
    fn from(record: &DoctorCredential) -> Self {
        Self {
            doctor_id: record.doctor_id.clone(),
            name: record.name.clone(),
            license_number: record.license_number.clone(),
            specialization: record.specialization.clone(),
            hospital_name: record.hospital_name.clone(),
            is_verified: record.is_verified,
        }
    }
}
