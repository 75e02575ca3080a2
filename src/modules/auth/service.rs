//! Cross-account auth flows: token refresh, logout, password reset and
//! email verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use medbay_auth::{AuthTokens, TokenService, TokenStore, TokenType};
use medbay_config::JwtConfig;
use medbay_core::{AppError, hash_password, password_meets_policy};

use crate::modules::chief_doctors::model::ChiefDoctorChanges;
use crate::modules::chief_doctors::store::ChiefDoctorStore;
use crate::modules::doctors::model::DoctorChanges;
use crate::modules::doctors::store::DoctorStore;
use crate::modules::hospitals::model::{Hospital, HospitalChanges};
use crate::modules::hospitals::store::HospitalStore;

use super::model::Actor;

/// Resolves actor ids across every account collection.
///
/// Lookup order is hospitals, then doctors, then chief doctors. Ids are
/// UUIDs, so a hit in one collection cannot shadow another in practice.
#[derive(Clone)]
pub struct ActorDirectory {
    hospitals: Arc<dyn HospitalStore>,
    doctors: Arc<dyn DoctorStore>,
    chief_doctors: Arc<dyn ChiefDoctorStore>,
}

impl ActorDirectory {
    pub fn new(
        hospitals: Arc<dyn HospitalStore>,
        doctors: Arc<dyn DoctorStore>,
        chief_doctors: Arc<dyn ChiefDoctorStore>,
    ) -> Self {
        Self {
            hospitals,
            doctors,
            chief_doctors,
        }
    }

    /// Finds the account `id` belongs to, if any.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Actor>, AppError> {
        if let Some(hospital) = self.hospitals.find_by_id(id).await? {
            return Ok(Some(Actor::Hospital(hospital)));
        }
        if let Some(doctor) = self.doctors.find_by_id(id).await? {
            return Ok(Some(Actor::Doctor(doctor)));
        }
        if let Some(chief_doctor) = self.chief_doctors.find_by_id(id).await? {
            return Ok(Some(Actor::ChiefDoctor(chief_doctor)));
        }
        Ok(None)
    }

    /// Replaces the password hash on whichever account `actor` is.
    pub async fn set_password(&self, actor: &Actor, password_hash: String) -> Result<(), AppError> {
        let updated = match actor {
            Actor::Hospital(hospital) => self
                .hospitals
                .update(
                    hospital.id,
                    HospitalChanges {
                        password_hash: Some(password_hash),
                        ..Default::default()
                    },
                )
                .await?
                .is_some(),
            Actor::Doctor(doctor) => self
                .doctors
                .update(
                    doctor.id,
                    DoctorChanges {
                        password_hash: Some(password_hash),
                        ..Default::default()
                    },
                )
                .await?
                .is_some(),
            Actor::ChiefDoctor(chief_doctor) => self
                .chief_doctors
                .update(
                    chief_doctor.id,
                    ChiefDoctorChanges {
                        password_hash: Some(password_hash),
                        ..Default::default()
                    },
                )
                .await?
                .is_some(),
        };

        if !updated {
            return Err(AppError::not_found(anyhow::anyhow!("Account not found")));
        }
        Ok(())
    }

    /// Marks the account's email verified.
    pub async fn mark_email_verified(&self, actor: &Actor) -> Result<(), AppError> {
        let updated = match actor {
            Actor::Hospital(hospital) => self
                .hospitals
                .update(
                    hospital.id,
                    HospitalChanges {
                        is_email_verified: Some(true),
                        ..Default::default()
                    },
                )
                .await?
                .is_some(),
            Actor::Doctor(doctor) => self
                .doctors
                .update(
                    doctor.id,
                    DoctorChanges {
                        is_email_verified: Some(true),
                        ..Default::default()
                    },
                )
                .await?
                .is_some(),
            Actor::ChiefDoctor(chief_doctor) => self
                .chief_doctors
                .update(
                    chief_doctor.id,
                    ChiefDoctorChanges {
                        is_email_verified: Some(true),
                        ..Default::default()
                    },
                )
                .await?
                .is_some(),
        };

        if !updated {
            return Err(AppError::not_found(anyhow::anyhow!("Account not found")));
        }
        Ok(())
    }
}

pub struct AuthService;

impl AuthService {
    /// Redeems a refresh token for a brand new pair.
    ///
    /// The presented token is consumed: one refresh token buys exactly one
    /// new pair, replaying it afterwards fails. Any problem with the token
    /// collapses into the same 401 the gate uses.
    #[instrument(skip_all)]
    pub async fn refresh_auth(
        directory: &ActorDirectory,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        refresh_token: &str,
    ) -> Result<AuthTokens, AppError> {
        let record =
            TokenService::verify_token(tokens, jwt_config, refresh_token, TokenType::Refresh)
                .await
                .map_err(|e| {
                    warn!(error = %e.error, "Refresh token rejected");
                    AppError::unauthorized(anyhow::anyhow!("Please authenticate"))
                })?;

        let actor = directory.find_by_id(record.actor_id).await?.ok_or_else(|| {
            warn!(actor.id = %record.actor_id, "Refresh token for unknown actor");
            AppError::unauthorized(anyhow::anyhow!("Please authenticate"))
        })?;

        tokens.delete(record.id).await?;

        let pair = TokenService::generate_auth_tokens(tokens, jwt_config, actor.id()).await?;

        info!(actor.id = %actor.id(), "Auth tokens refreshed");

        Ok(pair)
    }

    /// Invalidates one refresh token.
    ///
    /// No JWT verification here: an already-expired refresh token must
    /// still be removable.
    #[instrument(skip_all)]
    pub async fn logout(tokens: &dyn TokenStore, refresh_token: &str) -> Result<(), AppError> {
        let record = tokens
            .find_by_token(refresh_token, TokenType::Refresh)
            .await?
            .ok_or_else(|| {
                debug!("Logout with unknown refresh token");
                AppError::not_found(anyhow::anyhow!("Token not found"))
            })?;

        tokens.delete(record.id).await?;

        info!(actor.id = %record.actor_id, "Actor logged out");

        Ok(())
    }

    /// Issues a reset-password token for the hospital registered under
    /// `email`. The caller is responsible for mailing it out.
    #[instrument(skip(hospitals, tokens, jwt_config, email))]
    pub async fn forgot_password(
        hospitals: &dyn HospitalStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        email: &str,
    ) -> Result<(Hospital, String), AppError> {
        let email = email.trim().to_lowercase();

        let hospital = hospitals.find_by_email(&email).await?.ok_or_else(|| {
            debug!("Forgot password for unknown hospital email");
            AppError::not_found(anyhow::anyhow!("No hospitals found with this email"))
        })?;

        let expires_at =
            Utc::now() + Duration::minutes(jwt_config.reset_password_expiration_minutes);
        let token = TokenService::generate_purpose_token(
            tokens,
            jwt_config,
            hospital.id,
            TokenType::ResetPassword,
            expires_at,
        )
        .await?;

        info!(hospital.id = %hospital.id, "Reset password token issued");

        Ok((hospital, token))
    }

    /// Redeems a reset-password token and replaces the account password.
    ///
    /// Any problem with the token itself collapses into a single 401 so
    /// the response does not leak why the reset was rejected.
    #[instrument(skip_all)]
    pub async fn reset_password(
        directory: &ActorDirectory,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !password_meets_policy(new_password) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Password must contain at least one letter and one number"
            )));
        }

        let record =
            TokenService::verify_token(tokens, jwt_config, token, TokenType::ResetPassword)
                .await
                .map_err(|e| {
                    warn!(error = %e.error, "Password reset token rejected");
                    AppError::unauthorized(anyhow::anyhow!("Password reset failed"))
                })?;

        let actor = directory.find_by_id(record.actor_id).await?.ok_or_else(|| {
            warn!(actor.id = %record.actor_id, "Reset token for unknown actor");
            AppError::unauthorized(anyhow::anyhow!("Password reset failed"))
        })?;

        let password_hash = hash_password(new_password)?;
        directory.set_password(&actor, password_hash).await?;

        tokens
            .delete_for_actor(actor.id(), TokenType::ResetPassword)
            .await?;

        info!(actor.id = %actor.id(), "Password reset completed");

        Ok(())
    }

    /// Issues a verify-email token for `actor`. The caller mails it out.
    #[instrument(skip(tokens, jwt_config, actor), fields(actor.id = %actor.id()))]
    pub async fn send_verification_email(
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        actor: &Actor,
    ) -> Result<String, AppError> {
        let expires_at =
            Utc::now() + Duration::minutes(jwt_config.verify_email_expiration_minutes);
        let token = TokenService::generate_purpose_token(
            tokens,
            jwt_config,
            actor.id(),
            TokenType::VerifyEmail,
            expires_at,
        )
        .await?;

        info!("Verification email token issued");

        Ok(token)
    }

    /// Redeems a verify-email token and marks the account verified.
    #[instrument(skip_all)]
    pub async fn verify_email(
        directory: &ActorDirectory,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<(), AppError> {
        let record = TokenService::verify_token(tokens, jwt_config, token, TokenType::VerifyEmail)
            .await
            .map_err(|e| {
                warn!(error = %e.error, "Email verification token rejected");
                AppError::unauthorized(anyhow::anyhow!("Email verification failed"))
            })?;

        let actor = directory.find_by_id(record.actor_id).await?.ok_or_else(|| {
            warn!(actor.id = %record.actor_id, "Verification token for unknown actor");
            AppError::unauthorized(anyhow::anyhow!("Email verification failed"))
        })?;

        tokens
            .delete_for_actor(actor.id(), TokenType::VerifyEmail)
            .await?;
        directory.mark_email_verified(&actor).await?;

        info!(actor.id = %actor.id(), "Email verified");

        Ok(())
    }
}
