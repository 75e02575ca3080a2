//! Persisted token records and the store trait backing them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use medbay_core::AppError;
use sqlx::FromRow;
use uuid::Uuid;

use crate::claims::TokenType;

/// A token persisted for later verification.
#[derive(Debug, Clone, FromRow)]
pub struct TokenRecord {
    pub id: Uuid,
    pub token: String,
    /// Id of the hospital, doctor or chief doctor the token was issued to.
    pub actor_id: Uuid,
    pub token_type: TokenType,
    pub expires_at: DateTime<Utc>,
    pub blacklisted: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new token.
#[derive(Debug, Clone)]
pub struct NewTokenRecord {
    pub token: String,
    pub actor_id: Uuid,
    pub token_type: TokenType,
    pub expires_at: DateTime<Utc>,
    pub blacklisted: bool,
}

/// Persistence operations the token service needs.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists a new token record.
    async fn create(&self, record: NewTokenRecord) -> Result<TokenRecord, AppError>;

    /// Finds a non-blacklisted record matching token string, type and
    /// subject.
    async fn find_live(
        &self,
        token: &str,
        token_type: TokenType,
        actor_id: Uuid,
    ) -> Result<Option<TokenRecord>, AppError>;

    /// Finds a non-blacklisted record by token string and type alone.
    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<TokenRecord>, AppError>;

    /// Marks a record blacklisted, keeping it on file.
    async fn blacklist(&self, id: Uuid) -> Result<(), AppError>;

    /// Removes a single record.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Removes every record of `token_type` issued to `actor_id`, returning
    /// how many were removed.
    async fn delete_for_actor(
        &self,
        actor_id: Uuid,
        token_type: TokenType,
    ) -> Result<u64, AppError>;
}
