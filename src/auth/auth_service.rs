use crate::auth::auth_repository::{EmailTokenRepository, RefreshTokenRepository};
use crate::auth::mailer::Mailer;
use crate::auth::{create_access_token, create_refresh_token, hash_password, verify_jwt, verify_password};
use crate::error::{AppError, Result};
use crate::user::user_models::User;
use crate::user::user_repository::UserRepository;
use chrono::{Duration, Utc};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    refresh_token_repo: RefreshTokenRepository,
    email_token_repo: EmailTokenRepository,
    mailer: Mailer,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        refresh_token_repo: RefreshTokenRepository,
        email_token_repo: EmailTokenRepository,
        mailer: Mailer,
        jwt_secret: String,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            email_token_repo,
            mailer,
            jwt_secret,
        }
    }

    /// Creates an unverified account and mails a verification token.
    /// The user cannot log in until the token is redeemed.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = self.user_repo.create(name, email, &password_hash).await?;

        self.issue_verification_token(&user).await?;

        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        verify_password(password, &user.password_hash)?;

        if !user.email_verified {
            return Err(AppError::Forbidden(
                "Email not verified. Check your inbox for the verification mail.".to_string(),
            ));
        }

        let access_token = create_access_token(user.id, &user.email, &self.jwt_secret)?;
        let refresh_token = create_refresh_token(user.id, &user.email, &self.jwt_secret)?;

        self.refresh_token_repo
            .create(user.id, &refresh_token)
            .await?;

        Ok((user, access_token, refresh_token))
    }

    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<(String, String)> {
        let claims = verify_jwt(refresh_token, &self.jwt_secret)?;

        if claims.token_type != "refresh" {
            return Err(AppError::Unauthorized("Not a refresh token".to_string()));
        }

        let stored_token = self
            .refresh_token_repo
            .find_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        if stored_token.revoked {
            return Err(AppError::Unauthorized("Token has been revoked".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let new_access_token = create_access_token(user.id, &user.email, &self.jwt_secret)?;
        let new_refresh_token = create_refresh_token(user.id, &user.email, &self.jwt_secret)?;

        self.refresh_token_repo.revoke_by_token(refresh_token).await?;
        self.refresh_token_repo
            .create(user.id, &new_refresh_token)
            .await?;

        Ok((new_access_token, new_refresh_token))
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        self.refresh_token_repo.revoke_by_token(refresh_token).await
    }

    pub async fn verify_email(&self, token: Uuid) -> Result<()> {
        let email_token = self
            .email_token_repo
            .find_live(token, "verify")
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Verification token is invalid or expired".to_string())
            })?;

        self.user_repo.mark_email_verified(email_token.user_id).await?;
        self.email_token_repo.mark_used(email_token.token).await?;

        tracing::info!(user_id = %email_token.user_id, "Email verified");
        Ok(())
    }

    /// Always succeeds from the caller's perspective so the endpoint does not
    /// leak which addresses have accounts.
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        if let Some(user) = self.user_repo.find_by_email(email).await? {
            if !user.email_verified {
                self.issue_verification_token(&user).await?;
            }
        }
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        if let Some(user) = self.user_repo.find_by_email(email).await? {
            let token = self
                .email_token_repo
                .create(user.id, "reset", Utc::now() + Duration::hours(1))
                .await?;
            self.mailer
                .send_password_reset_email(&user.email, &token.token.to_string())
                .await?;
        }
        Ok(())
    }

    pub async fn reset_password(&self, token: Uuid, new_password: &str) -> Result<()> {
        let email_token = self
            .email_token_repo
            .find_live(token, "reset")
            .await?
            .ok_or_else(|| AppError::NotFound("Reset token is invalid or expired".to_string()))?;

        let password_hash = hash_password(new_password)?;
        self.user_repo
            .update_password(email_token.user_id, &password_hash)
            .await?;
        self.email_token_repo.mark_used(email_token.token).await?;

        tracing::info!(user_id = %email_token.user_id, "Password reset");
        Ok(())
    }

    async fn issue_verification_token(&self, user: &User) -> Result<()> {
        let token = self
            .email_token_repo
            .create(user.id, "verify", Utc::now() + Duration::hours(24))
            .await?;
        self.mailer
            .send_verification_email(&user.email, &token.token.to_string())
            .await
    }
}
