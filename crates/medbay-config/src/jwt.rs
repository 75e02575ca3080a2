//! JWT signing configuration.

use std::env;

/// Settings for token signing and lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify every token.
    pub secret: String,
    /// Lifetime of access tokens, in minutes.
    pub access_expiration_minutes: i64,
    /// Lifetime of refresh tokens, in days.
    pub refresh_expiration_days: i64,
    /// Lifetime of reset-password tokens, in minutes.
    pub reset_password_expiration_minutes: i64,
    /// Lifetime of verify-email tokens, in minutes.
    pub verify_email_expiration_minutes: i64,
}

impl JwtConfig {
    /// Reads the JWT configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set. Every other value has a default.
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_expiration_minutes: env::var("JWT_ACCESS_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30), // 30 minutes
            refresh_expiration_days: env::var("JWT_REFRESH_EXPIRATION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30), // 30 days
            reset_password_expiration_minutes: env::var("JWT_RESET_PASSWORD_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10), // 10 minutes
            verify_email_expiration_minutes: env::var("JWT_VERIFY_EMAIL_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10), // 10 minutes
        }
    }
}
