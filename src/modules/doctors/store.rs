//! Doctor persistence.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use medbay_core::AppError;

use super::model::{Doctor, DoctorChanges, DoctorFilterParams, NewDoctor};

/// Persistence operations for doctor accounts.
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, AppError>;

    /// Doctor plus its password hash, for credential checks only.
    async fn find_credentials(&self, email: &str) -> Result<Option<(Doctor, String)>, AppError>;

    /// Whether `email` is already used by a doctor other than `exclude_id`.
    async fn is_email_taken(&self, email: &str, exclude_id: Option<Uuid>)
    -> Result<bool, AppError>;

    /// Filtered page of doctors plus the total matching count.
    async fn list(&self, filters: &DoctorFilterParams) -> Result<(Vec<Doctor>, i64), AppError>;

    /// Applies `changes` and returns the updated row, or `None` when the
    /// doctor does not exist.
    async fn update(&self, id: Uuid, changes: DoctorChanges) -> Result<Option<Doctor>, AppError>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const COLUMNS: &str = "id, name, email, specialization, medical_license_number, \
                       years_of_experience, education_qualifications, work_history, \
                       specialized_training, availability, profile_picture, role, \
                       is_email_verified, hospital_id, hospital, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DoctorWithPassword {
    #[sqlx(flatten)]
    doctor: Doctor,
    password: String,
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        warn!(constraint = ?db_err.constraint(), "Unique violation on doctors");
        return AppError::bad_request(anyhow::anyhow!("Email already taken"));
    }
    error!(error = %e, "Database error writing doctor");
    AppError::from(e)
}

/// Postgres-backed [`DoctorStore`].
pub struct PgDoctorStore {
    db: PgPool,
}

impl PgDoctorStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorStore for PgDoctorStore {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor, AppError> {
        let query = format!(
            "INSERT INTO doctors
                 (name, email, password, specialization, medical_license_number,
                  years_of_experience, education_qualifications, work_history,
                  specialized_training, availability, profile_picture, role,
                  hospital_id, hospital)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Doctor>(&query)
            .bind(&doctor.name)
            .bind(&doctor.email)
            .bind(&doctor.password_hash)
            .bind(&doctor.specialization)
            .bind(&doctor.medical_license_number)
            .bind(doctor.years_of_experience)
            .bind(&doctor.education_qualifications)
            .bind(&doctor.work_history)
            .bind(&doctor.specialized_training)
            .bind(&doctor.availability)
            .bind(&doctor.profile_picture)
            .bind(doctor.role)
            .bind(doctor.hospital.hospital_id)
            .bind(sqlx::types::Json(&doctor.hospital))
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, AppError> {
        let query = format!("SELECT {COLUMNS} FROM doctors WHERE id = $1");

        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(doctor.id = %id, error = %e, "Database error fetching doctor");
                AppError::from(e)
            })
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Doctor, String)>, AppError> {
        let query = format!("SELECT {COLUMNS}, password FROM doctors WHERE email = $1");

        let row = sqlx::query_as::<_, DoctorWithPassword>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching doctor credentials");
                AppError::from(e)
            })?;

        Ok(row.map(|row| (row.doctor, row.password)))
    }

    async fn is_email_taken(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM doctors WHERE email = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error checking doctor email");
            AppError::from(e)
        })
    }

    async fn list(&self, filters: &DoctorFilterParams) -> Result<(Vec<Doctor>, i64), AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count_query = String::from("SELECT COUNT(*) FROM doctors WHERE 1=1");
        let mut where_clause = String::new();
        let mut params = Vec::new();

        if let Some(name) = &filters.name {
            params.push(format!("%{}%", name));
            where_clause.push_str(&format!(" AND name ILIKE ${}", params.len()));
        }

        if let Some(specialization) = &filters.specialization {
            params.push(format!("%{}%", specialization));
            where_clause.push_str(&format!(" AND specialization ILIKE ${}", params.len()));
        }

        if let Some(hospital_id) = filters.hospital_id {
            params.push(hospital_id.to_string());
            where_clause.push_str(&format!(" AND hospital_id = ${}::uuid", params.len()));
        }

        count_query.push_str(&where_clause);

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(&self.db).await.map_err(|e| {
            error!(error = %e, "Database error counting doctors");
            AppError::from(e)
        })?;

        let mut data_query = format!("SELECT {COLUMNS} FROM doctors WHERE 1=1");
        data_query.push_str(&where_clause);
        data_query.push_str(" ORDER BY created_at DESC");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, Doctor>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let doctors = data_sql.fetch_all(&self.db).await.map_err(|e| {
            error!(error = %e, "Database error fetching doctors");
            AppError::from(e)
        })?;

        Ok((doctors, total))
    }

    async fn update(&self, id: Uuid, changes: DoctorChanges) -> Result<Option<Doctor>, AppError> {
        let query = format!(
            "UPDATE doctors SET
                 name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 password = COALESCE($4, password),
                 specialization = COALESCE($5, specialization),
                 medical_license_number = COALESCE($6, medical_license_number),
                 years_of_experience = COALESCE($7, years_of_experience),
                 education_qualifications = COALESCE($8, education_qualifications),
                 work_history = COALESCE($9, work_history),
                 specialized_training = COALESCE($10, specialized_training),
                 availability = COALESCE($11, availability),
                 profile_picture = COALESCE($12, profile_picture),
                 is_email_verified = COALESCE($13, is_email_verified),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .bind(&changes.specialization)
            .bind(&changes.medical_license_number)
            .bind(changes.years_of_experience)
            .bind(&changes.education_qualifications)
            .bind(&changes.work_history)
            .bind(&changes.specialized_training)
            .bind(&changes.availability)
            .bind(&changes.profile_picture)
            .bind(changes.is_email_verified)
            .fetch_optional(&self.db)
            .await
            .map_err(map_write_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(doctor.id = %id, error = %e, "Database error deleting doctor");
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
