//! Auth data models and DTOs.
//!
//! # Core Types
//!
//! - [`Actor`] - Any account that can authenticate against the API
//!
//! # Request DTOs
//!
//! - [`LoginDto`] - Credentials, shared by every login endpoint
//! - [`RefreshTokenDto`] - Refresh token body for refresh and logout
//! - [`ForgotPasswordDto`] - Email requesting a password reset
//! - [`ResetPasswordDto`] - New password accompanying a reset token
//! - [`TokenQuery`] - `?token=` query for reset and verification links

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use medbay_auth::Role;

use crate::modules::chief_doctors::model::ChiefDoctor;
use crate::modules::doctors::model::Doctor;
use crate::modules::hospitals::model::Hospital;

/// Any account that can authenticate against the API.
///
/// The variants carry the full entity so code behind the gate can use the
/// record without another fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    Hospital(Hospital),
    Doctor(Doctor),
    ChiefDoctor(ChiefDoctor),
}

impl Actor {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Actor::Hospital(hospital) => hospital.id,
            Actor::Doctor(doctor) => doctor.id,
            Actor::ChiefDoctor(chief_doctor) => chief_doctor.id,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Actor::Hospital(hospital) => hospital.role,
            Actor::Doctor(doctor) => doctor.role,
            Actor::ChiefDoctor(chief_doctor) => chief_doctor.role,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Actor::Hospital(hospital) => &hospital.email,
            Actor::Doctor(doctor) => &doctor.email,
            Actor::ChiefDoctor(chief_doctor) => &chief_doctor.email,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Actor::Hospital(hospital) => &hospital.name,
            Actor::Doctor(doctor) => &doctor.name,
            Actor::ChiefDoctor(chief_doctor) => &chief_doctor.name,
        }
    }

    #[must_use]
    pub fn is_email_verified(&self) -> bool {
        match self {
            Actor::Hospital(hospital) => hospital.is_email_verified,
            Actor::Doctor(doctor) => doctor.is_email_verified,
            Actor::ChiefDoctor(chief_doctor) => chief_doctor.is_email_verified,
        }
    }
}

/// Credentials, shared by every login endpoint.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Refresh token body, used by both refresh and logout.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RefreshTokenDto {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Email requesting a password reset.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ForgotPasswordDto {
    #[validate(email)]
    pub email: String,
}

/// New password accompanying a reset token.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ResetPasswordDto {
    #[validate(length(min = 8))]
    pub password: String,
}

/// `?token=` query carried by reset-password and verify-email links.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct TokenQuery {
    pub token: String,
}
