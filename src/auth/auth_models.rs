use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

/// Single-use token mailed to a user for email verification or password reset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailToken {
    pub token: Uuid,
    pub user_id: Uuid,
    pub kind: String, // "verify" or "reset"
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
