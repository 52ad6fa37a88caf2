use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::auth_models::{EmailToken, RefreshToken};

#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, token: &str) -> Result<RefreshToken> {
        let refresh_token = sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (user_id, token) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(refresh_token)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let refresh_token =
            sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(refresh_token)
    }

    pub async fn revoke_by_token(&self, token: &str) -> Result<()> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailTokenRepository {
    pool: PgPool,
}

impl EmailTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        kind: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailToken> {
        let token = sqlx::query_as::<_, EmailToken>(
            "INSERT INTO email_tokens (user_id, kind, expires_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(kind)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    /// Finds a live (unused, unexpired) token of the given kind.
    pub async fn find_live(&self, token: Uuid, kind: &str) -> Result<Option<EmailToken>> {
        let token = sqlx::query_as::<_, EmailToken>(
            "SELECT * FROM email_tokens
             WHERE token = $1 AND kind = $2 AND used = FALSE AND expires_at > NOW()",
        )
        .bind(token)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    pub async fn mark_used(&self, token: Uuid) -> Result<()> {
        sqlx::query("UPDATE email_tokens SET used = TRUE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
