//! Shared domain types for the healthgate gateway.
//!
//! The record structs in [`record`] are the wire shapes exchanged with the
//! ledger chaincode; their JSON field names are fixed by the deployed
//! contract and must not change.

pub mod record;
pub mod role;

pub use record::{AccessGrant, AccessValidity, AuditEntry, DoctorRecord, PatientRecord};
pub use role::{Claims, Role, RoleParseError};
