//! HTTP handlers for the cross-account auth flows.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use utoipa::ToSchema;

use medbay_auth::AuthTokens;
use medbay_core::AppError;

use crate::middleware::auth::CurrentActor;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

use super::model::{ForgotPasswordDto, RefreshTokenDto, ResetPasswordDto, TokenQuery};
use super::service::AuthService;

/// Error body shared by every endpoint.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Exchange a refresh token for a new access/refresh pair.
#[utoipa::path(
    post,
    path = "/api/auth/refresh-tokens",
    request_body = RefreshTokenDto,
    responses(
        (status = 200, description = "New token pair issued", body = AuthTokens),
        (status = 401, description = "Invalid, expired or already used refresh token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenDto>,
) -> Result<Json<AuthTokens>, AppError> {
    let tokens = AuthService::refresh_auth(
        &state.actors(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &dto.refresh_token,
    )
    .await?;

    Ok(Json(tokens))
}

/// Log out by invalidating a refresh token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshTokenDto,
    responses(
        (status = 204, description = "Logged out"),
        (status = 404, description = "Token not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenDto>,
) -> Result<StatusCode, AppError> {
    AuthService::logout(state.tokens.as_ref(), &dto.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request a password reset email.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordDto,
    responses(
        (status = 204, description = "Reset email sent"),
        (status = 404, description = "No hospitals found with this email", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordDto>,
) -> Result<StatusCode, AppError> {
    let (hospital, token) = AuthService::forgot_password(
        state.hospitals.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &dto.email,
    )
    .await?;

    EmailService::new(state.email_config.clone())
        .send_reset_password_email(&hospital.email, &hospital.name, &token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reset a password using the emailed token.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    params(
        ("token" = String, Query, description = "Reset token from the email link")
    ),
    request_body = ResetPasswordDto,
    responses(
        (status = 204, description = "Password reset"),
        (status = 401, description = "Password reset failed", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    query: Result<Query<TokenQuery>, QueryRejection>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordDto>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    AuthService::reset_password(
        &state.actors(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &query.token,
        &dto.password,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Email a verification link to the authenticated account.
#[utoipa::path(
    post,
    path = "/api/auth/send-verification-email",
    responses(
        (status = 204, description = "Verification email sent"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn send_verification_email(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<StatusCode, AppError> {
    let token =
        AuthService::send_verification_email(state.tokens.as_ref(), &state.jwt_config, &actor)
            .await?;

    EmailService::new(state.email_config.clone())
        .send_verification_email(actor.email(), actor.name(), &token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Verify an email address using the emailed token.
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    params(
        ("token" = String, Query, description = "Verification token from the email link")
    ),
    responses(
        (status = 204, description = "Email verified"),
        (status = 401, description = "Email verification failed", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    AuthService::verify_email(
        &state.actors(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &query.token,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
