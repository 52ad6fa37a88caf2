use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{error::Result, state::AppState};

use super::auth_dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, ResendVerificationRequest, ResetPasswordRequest, VerifyEmailRequest,
};

/// Register a new account (email verification required before login)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification mail sent"),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(payload.name.trim(), &payload.email, &payload.password)
        .await?;

    tracing::info!(user_id = %user.id, "Account registered");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Account created. Check your inbox for the verification mail."
        })),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (user, access_token, refresh_token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: user.into(),
            access_token,
            refresh_token,
        }),
    ))
}

/// Rotate a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or revoked refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse> {
    let (access_token, refresh_token) = state
        .auth_service
        .refresh_access_token(&payload.refresh_token)
        .await?;

    Ok((
        StatusCode::OK,
        Json(RefreshTokenResponse {
            access_token,
            refresh_token,
        }),
    ))
}

/// Log out (revokes the refresh token)
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse> {
    state.auth_service.logout(&payload.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Redeem an email verification token
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    tag = "auth",
    request_body = VerifyEmailRequest,
    responses(
        (status = 204, description = "Email verified"),
        (status = 404, description = "Token invalid or expired")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse> {
    state.auth_service.verify_email(payload.token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Resend the verification mail
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    tag = "auth",
    request_body = ResendVerificationRequest,
    responses(
        (status = 204, description = "Mail sent if the account exists and is unverified")
    )
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.auth_service.resend_verification(&payload.email).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request a password reset mail
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 204, description = "Mail sent if the account exists")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.auth_service.forgot_password(&payload.email).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Redeem a password reset token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password updated"),
        (status = 404, description = "Token invalid or expired")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .auth_service
        .reset_password(payload.token, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
