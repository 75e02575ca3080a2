//! Hospital data models and DTOs.
//!
//! # Core Types
//!
//! - [`Hospital`] - Hospital account entity from the database
//! - [`HospitalSnapshot`] - Hospital fields embedded in staff records
//!
//! # Request DTOs
//!
//! - [`RegisterHospitalDto`] - Register a new hospital account
//! - [`UpdateHospitalDto`] - Partially update a hospital
//! - [`HospitalFilterParams`] - Query parameters for filtering hospitals

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use medbay_auth::{AuthTokens, Role};
use medbay_core::{PaginationMeta, PaginationParams};

/// A hospital account.
///
/// Hospitals self-register and own the doctor and chief doctor accounts
/// created under them. The password hash never leaves the store layer.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub location: String,
    pub registration_id: String,
    pub hospital_type: String,
    pub contact: String,
    pub logo: Option<String>,
    pub role: Role,
    pub is_email_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// The hospital fields captured on a staff record at creation time.
///
/// Stored as JSON on the staff row. This is a point-in-time copy: renaming
/// a hospital later leaves existing snapshots untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct HospitalSnapshot {
    pub hospital_id: Uuid,
    pub name: String,
    pub email: String,
    pub location: String,
    pub registration_id: String,
    pub hospital_type: String,
    pub contact: String,
    pub logo: Option<String>,
    pub role: Role,
    pub is_email_verified: bool,
}

impl From<&Hospital> for HospitalSnapshot {
    fn from(hospital: &Hospital) -> Self {
        Self {
            hospital_id: hospital.id,
            name: hospital.name.clone(),
            email: hospital.email.clone(),
            location: hospital.location.clone(),
            registration_id: hospital.registration_id.clone(),
            hospital_type: hospital.hospital_type.clone(),
            contact: hospital.contact.clone(),
            logo: hospital.logo.clone(),
            role: hospital.role,
            is_email_verified: hospital.is_email_verified,
        }
    }
}

/// DTO for registering a new hospital account.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RegisterHospitalDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 5, max = 10))]
    pub registration_id: String,
    #[validate(length(min = 1))]
    pub hospital_type: String,
    #[validate(length(min = 1))]
    pub contact: String,
    pub logo: Option<String>,
}

/// DTO for partially updating a hospital.
///
/// The registration id is immutable after registration.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateHospitalDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(length(min = 1))]
    pub hospital_type: Option<String>,
    #[validate(length(min = 1))]
    pub contact: Option<String>,
    pub logo: Option<String>,
}

/// Fields the store needs to insert a hospital row.
#[derive(Debug, Clone)]
pub struct NewHospital {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub location: String,
    pub registration_id: String,
    pub hospital_type: String,
    pub contact: String,
    pub logo: Option<String>,
    pub role: Role,
}

/// Column changes applied by a partial update. `None` leaves the column
/// as it is.
#[derive(Debug, Clone, Default)]
pub struct HospitalChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub location: Option<String>,
    pub hospital_type: Option<String>,
    pub contact: Option<String>,
    pub logo: Option<String>,
    pub is_email_verified: Option<bool>,
}

/// Query parameters for filtering hospitals.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct HospitalFilterParams {
    pub name: Option<String>,
    pub role: Option<Role>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing hospitals.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedHospitalsResponse {
    pub data: Vec<Hospital>,
    pub meta: PaginationMeta,
}

/// Response returned by hospital register and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HospitalAuthResponse {
    pub hospital: Hospital,
    pub tokens: AuthTokens,
}
