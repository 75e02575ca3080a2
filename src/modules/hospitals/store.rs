//! Hospital persistence.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use medbay_core::AppError;

use super::model::{Hospital, HospitalChanges, HospitalFilterParams, NewHospital};

/// Persistence operations for hospital accounts.
#[async_trait]
pub trait HospitalStore: Send + Sync {
    async fn create(&self, hospital: NewHospital) -> Result<Hospital, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hospital>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Hospital>, AppError>;

    /// Hospital plus its password hash, for credential checks only.
    async fn find_credentials(&self, email: &str)
    -> Result<Option<(Hospital, String)>, AppError>;

    /// Whether `email` is already used by a hospital other than `exclude_id`.
    async fn is_email_taken(&self, email: &str, exclude_id: Option<Uuid>)
    -> Result<bool, AppError>;

    async fn is_registration_id_taken(&self, registration_id: &str) -> Result<bool, AppError>;

    /// Filtered page of hospitals plus the total matching count.
    async fn list(&self, filters: &HospitalFilterParams) -> Result<(Vec<Hospital>, i64), AppError>;

    /// Applies `changes` and returns the updated row, or `None` when the
    /// hospital does not exist.
    async fn update(&self, id: Uuid, changes: HospitalChanges)
    -> Result<Option<Hospital>, AppError>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const COLUMNS: &str = "id, name, email, location, registration_id, hospital_type, contact, logo, \
                       role, is_email_verified, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct HospitalWithPassword {
    #[sqlx(flatten)]
    hospital: Hospital,
    password: String,
}

/// Maps a unique violation on the hospitals table to the taken-field error,
/// everything else to a 500.
fn map_insert_error(e: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        let message = match db_err.constraint() {
            Some("hospitals_registration_id_key") => "Registration id already taken",
            _ => "Email already taken",
        };
        warn!(hospital.email = %email, constraint = ?db_err.constraint(), "Unique violation on hospitals");
        return AppError::bad_request(anyhow::anyhow!(message));
    }
    error!(error = %e, "Database error writing hospital");
    AppError::from(e)
}

/// Postgres-backed [`HospitalStore`].
pub struct PgHospitalStore {
    db: PgPool,
}

impl PgHospitalStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HospitalStore for PgHospitalStore {
    async fn create(&self, hospital: NewHospital) -> Result<Hospital, AppError> {
        let query = format!(
            "INSERT INTO hospitals
                 (name, email, password, location, registration_id, hospital_type, contact,
                  logo, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Hospital>(&query)
            .bind(&hospital.name)
            .bind(&hospital.email)
            .bind(&hospital.password_hash)
            .bind(&hospital.location)
            .bind(&hospital.registration_id)
            .bind(&hospital.hospital_type)
            .bind(&hospital.contact)
            .bind(&hospital.logo)
            .bind(hospital.role)
            .fetch_one(&self.db)
            .await
            .map_err(|e| map_insert_error(e, &hospital.email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hospital>, AppError> {
        let query = format!("SELECT {COLUMNS} FROM hospitals WHERE id = $1");

        sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(hospital.id = %id, error = %e, "Database error fetching hospital");
                AppError::from(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Hospital>, AppError> {
        let query = format!("SELECT {COLUMNS} FROM hospitals WHERE email = $1");

        sqlx::query_as::<_, Hospital>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching hospital by email");
                AppError::from(e)
            })
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(Hospital, String)>, AppError> {
        let query = format!("SELECT {COLUMNS}, password FROM hospitals WHERE email = $1");

        let row = sqlx::query_as::<_, HospitalWithPassword>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching hospital credentials");
                AppError::from(e)
            })?;

        Ok(row.map(|row| (row.hospital, row.password)))
    }

    async fn is_email_taken(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM hospitals WHERE email = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error checking hospital email");
            AppError::from(e)
        })
    }

    async fn is_registration_id_taken(&self, registration_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM hospitals WHERE registration_id = $1)",
        )
        .bind(registration_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error checking registration id");
            AppError::from(e)
        })
    }

    async fn list(&self, filters: &HospitalFilterParams) -> Result<(Vec<Hospital>, i64), AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count_query = String::from("SELECT COUNT(*) FROM hospitals WHERE 1=1");
        let mut where_clause = String::new();
        let mut params = Vec::new();

        if let Some(name) = &filters.name {
            params.push(format!("%{}%", name));
            where_clause.push_str(&format!(" AND name ILIKE ${}", params.len()));
        }

        if let Some(role) = filters.role {
            params.push(role.as_str().to_string());
            where_clause.push_str(&format!(" AND role = ${}::actor_role", params.len()));
        }

        count_query.push_str(&where_clause);

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(&self.db).await.map_err(|e| {
            error!(error = %e, "Database error counting hospitals");
            AppError::from(e)
        })?;

        let mut data_query = format!("SELECT {COLUMNS} FROM hospitals WHERE 1=1");
        data_query.push_str(&where_clause);
        data_query.push_str(" ORDER BY created_at DESC");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, Hospital>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let hospitals = data_sql.fetch_all(&self.db).await.map_err(|e| {
            error!(error = %e, "Database error fetching hospitals");
            AppError::from(e)
        })?;

        Ok((hospitals, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: HospitalChanges,
    ) -> Result<Option<Hospital>, AppError> {
        let query = format!(
            "UPDATE hospitals SET
                 name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 password = COALESCE($4, password),
                 location = COALESCE($5, location),
                 hospital_type = COALESCE($6, hospital_type),
                 contact = COALESCE($7, contact),
                 logo = COALESCE($8, logo),
                 is_email_verified = COALESCE($9, is_email_verified),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .bind(&changes.location)
            .bind(&changes.hospital_type)
            .bind(&changes.contact)
            .bind(&changes.logo)
            .bind(changes.is_email_verified)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| map_insert_error(e, changes.email.as_deref().unwrap_or("")))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM hospitals WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(hospital.id = %id, error = %e, "Database error deleting hospital");
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
