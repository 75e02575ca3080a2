//! Chief doctor data models and DTOs.
//!
//! Chief doctors share the shape of doctors but carry their own role and
//! rights, so they live in their own table and module.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use medbay_auth::{AuthTokens, Role};
use medbay_core::{PaginationMeta, PaginationParams};

use crate::modules::hospitals::model::HospitalSnapshot;
use crate::utils::serde::deserialize_optional_uuid;

/// A chief doctor account.
///
/// Like doctors, every chief doctor belongs to exactly one hospital and
/// carries the snapshot taken at creation time.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ChiefDoctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub medical_license_number: String,
    pub years_of_experience: i32,
    pub education_qualifications: String,
    pub work_history: Option<String>,
    pub specialized_training: Option<String>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
    pub role: Role,
    pub is_email_verified: bool,
    pub hospital_id: Uuid,
    #[sqlx(json)]
    pub hospital: HospitalSnapshot,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a chief doctor.
///
/// The owning hospital comes from the URL, not the body.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateChiefDoctorDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub specialization: String,
    #[validate(length(min = 1))]
    pub medical_license_number: String,
    #[validate(range(min = 0))]
    pub years_of_experience: i32,
    #[validate(length(min = 1))]
    pub education_qualifications: String,
    pub work_history: Option<String>,
    pub specialized_training: Option<String>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
}

/// DTO for partially updating a chief doctor.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateChiefDoctorDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(min = 1))]
    pub specialization: Option<String>,
    #[validate(length(min = 1))]
    pub medical_license_number: Option<String>,
    #[validate(range(min = 0))]
    pub years_of_experience: Option<i32>,
    #[validate(length(min = 1))]
    pub education_qualifications: Option<String>,
    pub work_history: Option<String>,
    pub specialized_training: Option<String>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
}

/// Fields the store needs to insert a chief doctor row.
#[derive(Debug, Clone)]
pub struct NewChiefDoctor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub specialization: String,
    pub medical_license_number: String,
    pub years_of_experience: i32,
    pub education_qualifications: String,
    pub work_history: Option<String>,
    pub specialized_training: Option<String>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
    pub role: Role,
    pub hospital: HospitalSnapshot,
}

/// Column changes applied by a partial update. `None` leaves the column
/// as it is.
#[derive(Debug, Clone, Default)]
pub struct ChiefDoctorChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub specialization: Option<String>,
    pub medical_license_number: Option<String>,
    pub years_of_experience: Option<i32>,
    pub education_qualifications: Option<String>,
    pub work_history: Option<String>,
    pub specialized_training: Option<String>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
    pub is_email_verified: Option<bool>,
}

/// Query parameters for filtering chief doctors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChiefDoctorFilterParams {
    pub name: Option<String>,
    pub specialization: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub hospital_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing chief doctors.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedChiefDoctorsResponse {
    pub data: Vec<ChiefDoctor>,
    pub meta: PaginationMeta,
}

/// Response returned by chief doctor creation and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChiefDoctorAuthResponse {
    pub chief_doctor: ChiefDoctor,
    pub tokens: AuthTokens,
}
