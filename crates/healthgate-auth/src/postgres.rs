//! PostgreSQL credential store.
//!
//! Uniqueness is enforced by the schema (primary keys plus unique aadhar
//! and license columns); violations surface as `StoreError::Duplicate`.

use crate::credentials::{DoctorCredential, PatientCredential};
use crate::error::{StoreError, StoreResult};
use crate::store::CredentialStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

/// Credential store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    /// Connect and initialize the schema.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        Self::connect_with_options(database_url, 10, 5).await
    }

    /// Connect with explicit pool parameters.
    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to connect postgres: {e}")))?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create adapter from an existing pool.
    pub async fn from_pool(pool: PgPool) -> StoreResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let ddl = [
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                patient_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                date_of_birth DATE NOT NULL,
                phone TEXT NOT NULL,
                aadhar_number TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                fingerprint_template_id INTEGER,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                last_login TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS doctors (
                doctor_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                license_number TEXT NOT NULL UNIQUE,
                specialization TEXT NOT NULL,
                hospital_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_verified BOOLEAN NOT NULL DEFAULT FALSE,
                verified_at TIMESTAMPTZ,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                last_login TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        ];

        for stmt in ddl {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(format!("schema init failed: {e}")))?;
        }
        Ok(())
    }
}

fn insert_error(e: sqlx::Error, key: &str) -> StoreError {
    if let Some(db_error) = e.as_database_error() {
        if db_error.is_unique_violation() {
            return StoreError::Duplicate(key.to_string());
        }
    }
    StoreError::Backend(e.to_string())
}

fn query_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn patient_from_row(row: &PgRow) -> StoreResult<PatientCredential> {
    Ok(PatientCredential {
        patient_id: row.try_get("patient_id").map_err(query_error)?,
        name: row.try_get("name").map_err(query_error)?,
        date_of_birth: row.try_get("date_of_birth").map_err(query_error)?,
        phone: row.try_get("phone").map_err(query_error)?,
        aadhar_number: row.try_get("aadhar_number").map_err(query_error)?,
        password_hash: row.try_get("password_hash").map_err(query_error)?,
        fingerprint_template_id: row.try_get("fingerprint_template_id").map_err(query_error)?,
        is_active: row.try_get("is_active").map_err(query_error)?,
        last_login: row.try_get("last_login").map_err(query_error)?,
        created_at: row.try_get("created_at").map_err(query_error)?,
        updated_at: row.try_get("updated_at").map_err(query_error)?,
    })
}

fn doctor_from_row(row: &PgRow) -> StoreResult<DoctorCredential> {
    Ok(DoctorCredential {
        doctor_id: row.try_get("doctor_id").map_err(query_error)?,
        name: row.try_get("name").map_err(query_error)?,
        license_number: row.try_get("license_number").map_err(query_error)?,
        specialization: row.try_get("specialization").map_err(query_error)?,
        hospital_name: row.try_get("hospital_name").map_err(query_error)?,
        password_hash: row.try_get("password_hash").map_err(query_error)?,
        is_verified: row.try_get("is_verified").map_err(query_error)?,
        verified_at: row.try_get("verified_at").map_err(query_error)?,
        is_active: row.try_get("is_active").map_err(query_error)?,
        last_login: row.try_get("last_login").map_err(query_error)?,
        created_at: row.try_get("created_at").map_err(query_error)?,
        updated_at: row.try_get("updated_at").map_err(query_error)?,
    })
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert_patient(&self, patient: PatientCredential) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO patients
                (patient_id, name, date_of_birth, phone, aadhar_number, password_hash,
                 fingerprint_template_id, is_active, last_login, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&patient.patient_id)
        .bind(&patient.name)
        .bind(patient.date_of_birth)
        .bind(&patient.phone)
        .bind(&patient.aadhar_number)
        .bind(&patient.password_hash)
        .bind(patient.fingerprint_template_id)
        .bind(patient.is_active)
        .bind(patient.last_login)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, &patient.patient_id))?;
        Ok(())
    }

    async fn find_patient(&self, patient_id: &str) -> StoreResult<Option<PatientCredential>> {
        let row = sqlx::query("SELECT * FROM patients WHERE patient_id = $1")
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.as_ref().map(patient_from_row).transpose()
    }

    async fn touch_patient_login(&self, patient_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE patients SET last_login = $2, updated_at = $2 WHERE patient_id = $1")
            .bind(patient_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn insert_doctor(&self, doctor: DoctorCredential) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO doctors
                (doctor_id, name, license_number, specialization, hospital_name, password_hash,
                 is_verified, verified_at, is_active, last_login, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&doctor.doctor_id)
        .bind(&doctor.name)
        .bind(&doctor.license_number)
        .bind(&doctor.specialization)
        .bind(&doctor.hospital_name)
        .bind(&doctor.password_hash)
        .bind(doctor.is_verified)
        .bind(doctor.verified_at)
        .bind(doctor.is_active)
        .bind(doctor.last_login)
        .bind(doctor.created_at)
        .bind(doctor.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, &doctor.doctor_id))?;
        Ok(())
    }

    async fn find_doctor(&self, doctor_id: &str) -> StoreResult<Option<DoctorCredential>> {
        let row = sqlx::query("SELECT * FROM doctors WHERE doctor_id = $1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.as_ref().map(doctor_from_row).transpose()
    }

    async fn touch_doctor_login(&self, doctor_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE doctors SET last_login = $2, updated_at = $2 WHERE doctor_id = $1")
            .bind(doctor_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(())
    }
}
