//! Chief doctor persistence.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use medbay_core::AppError;

use super::model::{ChiefDoctor, ChiefDoctorChanges, ChiefDoctorFilterParams, NewChiefDoctor};

/// Persistence operations for chief doctor accounts.
#[async_trait]
pub trait ChiefDoctorStore: Send + Sync {
    async fn create(&self, chief_doctor: NewChiefDoctor) -> Result<ChiefDoctor, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChiefDoctor>, AppError>;

    /// Chief doctor plus its password hash, for credential checks only.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(ChiefDoctor, String)>, AppError>;

    /// Whether `email` is already used by a chief doctor other than
    /// `exclude_id`.
    async fn is_email_taken(&self, email: &str, exclude_id: Option<Uuid>)
    -> Result<bool, AppError>;

    /// Filtered page of chief doctors plus the total matching count.
    async fn list(
        &self,
        filters: &ChiefDoctorFilterParams,
    ) -> Result<(Vec<ChiefDoctor>, i64), AppError>;

    /// Applies `changes` and returns the updated row, or `None` when the
    /// chief doctor does not exist.
    async fn update(
        &self,
        id: Uuid,
        changes: ChiefDoctorChanges,
    ) -> Result<Option<ChiefDoctor>, AppError>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const COLUMNS: &str = "id, name, email, specialization, medical_license_number, \
                       years_of_experience, education_qualifications, work_history, \
                       specialized_training, availability, profile_picture, role, \
                       is_email_verified, hospital_id, hospital, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ChiefDoctorWithPassword {
    #[sqlx(flatten)]
    chief_doctor: ChiefDoctor,
    password: String,
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        warn!(constraint = ?db_err.constraint(), "Unique violation on chief_doctors");
        return AppError::bad_request(anyhow::anyhow!("Email already taken"));
    }
    error!(error = %e, "Database error writing chief doctor");
    AppError::from(e)
}

/// Postgres-backed [`ChiefDoctorStore`].
pub struct PgChiefDoctorStore {
    db: PgPool,
}

impl PgChiefDoctorStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChiefDoctorStore for PgChiefDoctorStore {
    async fn create(&self, chief_doctor: NewChiefDoctor) -> Result<ChiefDoctor, AppError> {
        let query = format!(
            "INSERT INTO chief_doctors
                 (name, email, password, specialization, medical_license_number,
                  years_of_experience, education_qualifications, work_history,
                  specialized_training, availability, profile_picture, role,
                  hospital_id, hospital)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, ChiefDoctor>(&query)
            .bind(&chief_doctor.name)
            .bind(&chief_doctor.email)
            .bind(&chief_doctor.password_hash)
            .bind(&chief_doctor.specialization)
            .bind(&chief_doctor.medical_license_number)
            .bind(chief_doctor.years_of_experience)
            .bind(&chief_doctor.education_qualifications)
            .bind(&chief_doctor.work_history)
            .bind(&chief_doctor.specialized_training)
            .bind(&chief_doctor.availability)
            .bind(&chief_doctor.profile_picture)
            .bind(chief_doctor.role)
            .bind(chief_doctor.hospital.hospital_id)
            .bind(sqlx::types::Json(&chief_doctor.hospital))
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChiefDoctor>, AppError> {
        let query = format!("SELECT {COLUMNS} FROM chief_doctors WHERE id = $1");

        sqlx::query_as::<_, ChiefDoctor>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(chief_doctor.id = %id, error = %e, "Database error fetching chief doctor");
                AppError::from(e)
            })
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(ChiefDoctor, String)>, AppError> {
        let query = format!("SELECT {COLUMNS}, password FROM chief_doctors WHERE email = $1");

        let row = sqlx::query_as::<_, ChiefDoctorWithPassword>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching chief doctor credentials");
                AppError::from(e)
            })?;

        Ok(row.map(|row| (row.chief_doctor, row.password)))
    }

    async fn is_email_taken(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chief_doctors WHERE email = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error checking chief doctor email");
            AppError::from(e)
        })
    }

    async fn list(
        &self,
        filters: &ChiefDoctorFilterParams,
    ) -> Result<(Vec<ChiefDoctor>, i64), AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count_query = String::from("SELECT COUNT(*) FROM chief_doctors WHERE 1=1");
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
            error!(error = %e, "Database error counting chief doctors");
            AppError::from(e)
        })?;

        let mut data_query = format!("SELECT {COLUMNS} FROM chief_doctors WHERE 1=1");
        data_query.push_str(&where_clause);
        data_query.push_str(" ORDER BY created_at DESC");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, ChiefDoctor>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let chief_doctors = data_sql.fetch_all(&self.db).await.map_err(|e| {
            error!(error = %e, "Database error fetching chief doctors");
            AppError::from(e)
        })?;

        Ok((chief_doctors, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ChiefDoctorChanges,
    ) -> Result<Option<ChiefDoctor>, AppError> {
        let query = format!(
            "UPDATE chief_doctors SET
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

        sqlx::query_as::<_, ChiefDoctor>(&query)
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
        let result = sqlx::query("DELETE FROM chief_doctors WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(chief_doctor.id = %id, error = %e, "Database error deleting chief doctor");
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
