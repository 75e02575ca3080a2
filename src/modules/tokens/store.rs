//! Postgres-backed token persistence.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use medbay_auth::{NewTokenRecord, TokenRecord, TokenStore, TokenType};
use medbay_core::AppError;

const COLUMNS: &str = "id, token, actor_id, token_type, expires_at, blacklisted, created_at";

/// Postgres-backed [`TokenStore`].
pub struct PgTokenStore {
    db: PgPool,
}

impl PgTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn create(&self, record: NewTokenRecord) -> Result<TokenRecord, AppError> {
        let query = format!(
            "INSERT INTO tokens (token, actor_id, token_type, expires_at, blacklisted)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, TokenRecord>(&query)
            .bind(&record.token)
            .bind(record.actor_id)
            .bind(record.token_type)
            .bind(record.expires_at)
            .bind(record.blacklisted)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error inserting token");
                AppError::from(e)
            })
    }

    async fn find_live(
        &self,
        token: &str,
        token_type: TokenType,
        actor_id: Uuid,
    ) -> Result<Option<TokenRecord>, AppError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tokens
             WHERE token = $1 AND token_type = $2 AND actor_id = $3 AND blacklisted = FALSE"
        );

        sqlx::query_as::<_, TokenRecord>(&query)
            .bind(token)
            .bind(token_type)
            .bind(actor_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching token");
                AppError::from(e)
            })
    }

    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<TokenRecord>, AppError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tokens
             WHERE token = $1 AND token_type = $2 AND blacklisted = FALSE"
        );

        sqlx::query_as::<_, TokenRecord>(&query)
            .bind(token)
            .bind(token_type)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching token");
                AppError::from(e)
            })
    }

    async fn blacklist(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE tokens SET blacklisted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(token.id = %id, error = %e, "Database error blacklisting token");
                AppError::from(e)
            })?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(token.id = %id, error = %e, "Database error deleting token");
                AppError::from(e)
            })?;

        Ok(())
    }

    async fn delete_for_actor(
        &self,
        actor_id: Uuid,
        token_type: TokenType,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tokens WHERE actor_id = $1 AND token_type = $2")
            .bind(actor_id)
            .bind(token_type)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(actor.id = %actor_id, error = %e, "Database error deleting actor tokens");
                AppError::from(e)
            })?;

        Ok(result.rows_affected())
    }
}
