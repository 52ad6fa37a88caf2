use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
};

use super::user_dto::{ProfileResponse, UpdateLastGroupRequest};

/// Get the current user's profile and visible groups
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile with groups", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let profile = state.user_service.get_current_user(user_id).await?;

    Ok((StatusCode::OK, Json(profile)))
}

/// Remember the last opened group
#[utoipa::path(
    put,
    path = "/api/users/me/last-group",
    tag = "users",
    request_body = UpdateLastGroupRequest,
    responses(
        (status = 204, description = "Stored"),
        (status = 404, description = "Caller is not in that group")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_last_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateLastGroupRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    state
        .user_service
        .update_last_group(user_id, payload.group_id.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
