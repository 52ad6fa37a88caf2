use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ACCESS_TOKEN_HOURS: i64 = 24;
pub const REFRESH_TOKEN_DAYS: i64 = 30;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub token_type: String, // "access" or "refresh"
    pub exp: i64,
}

fn create_token(
    user_id: Uuid,
    email: &str,
    token_type: &str,
    secret: &str,
    lifetime: Duration,
) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Internal("Token expiry overflow".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: token_type.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Internal("Failed to create token".to_string()))
}

pub fn create_access_token(user_id: Uuid, email: &str, secret: &str) -> Result<String> {
    create_token(
        user_id,
        email,
        "access",
        secret,
        Duration::hours(ACCESS_TOKEN_HOURS),
    )
}

pub fn create_refresh_token(user_id: Uuid, email: &str, secret: &str) -> Result<String> {
    create_token(
        user_id,
        email,
        "refresh",
        secret,
        Duration::days(REFRESH_TOKEN_DAYS),
    )
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "amara@example.com", "test-secret").unwrap();
        let claims = verify_jwt(&token, "test-secret").unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "amara@example.com");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_access_token(Uuid::new_v4(), "a@b.c", "secret-one").unwrap();
        assert!(verify_jwt(&token, "secret-two").is_err());
    }

    #[test]
    fn refresh_token_carries_type() {
        let token = create_refresh_token(Uuid::new_v4(), "a@b.c", "s").unwrap();
        let claims = verify_jwt(&token, "s").unwrap();
        assert_eq!(claims.token_type, "refresh");
    }
}
