//! Signing and decoding of JWTs.

use anyhow::anyhow;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use medbay_core::AppError;
use thiserror::Error;

use crate::claims::Claims;

/// Verification failures that map to distinct API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token failed signature or expiry checks.
    #[error("Invalid or expired token")]
    Invalid,
    /// The token decoded fine but no live persisted record backs it.
    #[error("Token not found")]
    NotFound,
}

/// Signs `claims` with the HMAC secret.
///
/// # Errors
///
/// Returns a 500 if encoding fails, which only happens when the key or
/// header is malformed.
pub fn sign_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Decodes a token and validates its signature and expiry.
///
/// Expiry is checked with zero leeway, so a token that expired one second
/// ago is already invalid.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}
