//! Token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use medbay_config::JwtConfig;
use medbay_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::claims::{Claims, TokenType};
use crate::jwt::{TokenError, decode_token, sign_token};
use crate::tokens::{NewTokenRecord, TokenRecord, TokenStore};

/// A signed token together with its expiry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenWithExpiry {
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// The pair returned by register, login and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthTokens {
    pub access: TokenWithExpiry,
    pub refresh: TokenWithExpiry,
}

/// Issues, persists and verifies the tokens the API hands out.
pub struct TokenService;

impl TokenService {
    /// Signs a token for `actor_id`. Pure signing, nothing is persisted.
    pub fn generate_token(
        actor_id: Uuid,
        expires_at: DateTime<Utc>,
        token_type: TokenType,
        secret: &str,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: actor_id.to_string(),
            iat: Utc::now().timestamp() as usize,
            exp: expires_at.timestamp() as usize,
            token_type,
        };
        sign_token(&claims, secret)
    }

    /// Persists an already-signed token.
    pub async fn save_token(
        store: &dyn TokenStore,
        token: &str,
        actor_id: Uuid,
        expires_at: DateTime<Utc>,
        token_type: TokenType,
        blacklisted: bool,
    ) -> Result<TokenRecord, AppError> {
        store
            .create(NewTokenRecord {
                token: token.to_string(),
                actor_id,
                token_type,
                expires_at,
                blacklisted,
            })
            .await
    }

    /// Verifies a presented token. The signature and expiry must check out,
    /// and a live persisted record of the expected type must back it.
    ///
    /// # Errors
    ///
    /// 401 `Invalid or expired token` when decoding fails, 401 `Token not
    /// found` when no live record matches.
    pub async fn verify_token(
        store: &dyn TokenStore,
        config: &JwtConfig,
        token: &str,
        token_type: TokenType,
    ) -> Result<TokenRecord, AppError> {
        let claims = decode_token(token, &config.secret).map_err(AppError::unauthorized)?;
        let actor_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(TokenError::Invalid))?;

        store
            .find_live(token, token_type, actor_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(TokenError::NotFound))
    }

    /// Issues the access/refresh pair for `actor_id`. The refresh token is
    /// persisted so it can be redeemed later; access tokens are never
    /// stored.
    pub async fn generate_auth_tokens(
        store: &dyn TokenStore,
        config: &JwtConfig,
        actor_id: Uuid,
    ) -> Result<AuthTokens, AppError> {
        let access_expires = Utc::now() + Duration::minutes(config.access_expiration_minutes);
        let access_token =
            Self::generate_token(actor_id, access_expires, TokenType::Access, &config.secret)?;

        let refresh_expires = Utc::now() + Duration::days(config.refresh_expiration_days);
        let refresh_token =
            Self::generate_token(actor_id, refresh_expires, TokenType::Refresh, &config.secret)?;
        Self::save_token(
            store,
            &refresh_token,
            actor_id,
            refresh_expires,
            TokenType::Refresh,
            false,
        )
        .await?;

        Ok(AuthTokens {
            access: TokenWithExpiry {
                token: access_token,
                expires: access_expires,
            },
            refresh: TokenWithExpiry {
                token: refresh_token,
                expires: refresh_expires,
            },
        })
    }

    /// Issues and persists a single-purpose token, used for the
    /// reset-password and verify-email flows.
    pub async fn generate_purpose_token(
        store: &dyn TokenStore,
        config: &JwtConfig,
        actor_id: Uuid,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let token = Self::generate_token(actor_id, expires_at, token_type, &config.secret)?;
        Self::save_token(store, &token, actor_id, expires_at, token_type, false).await?;
        Ok(token)
    }
}
