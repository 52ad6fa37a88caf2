use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    group::group_dto::{CreateGroupRequest, GroupResponse, JoinGroupRequest, MembersResponse},
    group::group_models::{GroupMember, UserGroup},
    middleware::AuthUser,
    state::AppState,
};

/// Create a new group (caller becomes the approved admin)
#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 400, description = "Empty group name"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let group = state
        .group_service
        .create_group(user_id, &payload.name)
        .await?;
    let (group, member) = state.group_service.get_group(&group.id, user_id).await?;

    Ok((StatusCode::CREATED, Json(GroupResponse::new(group, &member))))
}

/// List the caller's groups, pending memberships included
#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "groups",
    responses(
        (status = 200, description = "Groups visible to the caller", body = Vec<UserGroup>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_groups(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let groups = state.group_repository.find_user_groups(user_id).await?;

    Ok((StatusCode::OK, Json(groups)))
}

/// Request to join a group by its shareable id
#[utoipa::path(
    post,
    path = "/api/groups/join",
    tag = "groups",
    request_body = JoinGroupRequest,
    responses(
        (status = 200, description = "Membership (pending or existing)", body = GroupResponse),
        (status = 404, description = "Group not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn join_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<JoinGroupRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (group, member) = state
        .group_service
        .join_group(user_id, &payload.group_id)
        .await?;

    Ok((StatusCode::OK, Json(GroupResponse::new(group, &member))))
}

/// Get a group with the caller's membership state
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    tag = "groups",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group", body = GroupResponse),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Group not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse> {
    let (group, member) = state.group_service.get_group(&group_id, user_id).await?;

    Ok((StatusCode::OK, Json(GroupResponse::new(group, &member))))
}

/// Delete a group and all its entries (admin only)
#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}",
    tag = "groups",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 403, description = "Only the admin can delete"),
        (status = 404, description = "Group not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse> {
    state.group_service.delete_group(&group_id, user_id).await?;
    state.ws_connections.drop_group(&group_id);

    Ok(StatusCode::NO_CONTENT)
}

/// List members, split into approved and pending
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/members",
    tag = "groups",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Members", body = MembersResponse),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Group not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_members(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse> {
    let members = state.group_service.list_members(&group_id, user_id).await?;

    Ok((StatusCode::OK, Json(MembersResponse::split(members))))
}

/// List pending join requests (admin only)
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/pending",
    tag = "groups",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Pending join requests", body = Vec<GroupMember>),
        (status = 403, description = "Only the admin can review requests")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_pending(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse> {
    let pending = state.group_service.list_pending(&group_id, user_id).await?;

    Ok((StatusCode::OK, Json(pending)))
}

/// Approve a pending member (admin only, idempotent)
#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members/{user_id}/approve",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("user_id" = Uuid, Path, description = "User to approve")
    ),
    responses(
        (status = 200, description = "Approved member", body = GroupMember),
        (status = 403, description = "Only the admin can approve"),
        (status = 404, description = "Join request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_member(
    State(state): State<AppState>,
    AuthUser(acting_id): AuthUser,
    Path((group_id, target_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse> {
    let member = state
        .group_service
        .approve_member(&group_id, acting_id, target_id)
        .await?;

    Ok((StatusCode::OK, Json(member)))
}

/// Reject a pending join request (admin only)
#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members/{user_id}/reject",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("user_id" = Uuid, Path, description = "User to reject")
    ),
    responses(
        (status = 204, description = "Request rejected"),
        (status = 400, description = "Member is already approved"),
        (status = 403, description = "Only the admin can reject"),
        (status = 404, description = "Join request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_member(
    State(state): State<AppState>,
    AuthUser(acting_id): AuthUser,
    Path((group_id, target_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse> {
    state
        .group_service
        .reject_member(&group_id, acting_id, target_id)
        .await?;
    state.ws_connections.unsubscribe(&group_id, &target_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a member from the group (admin only, admin cannot be removed)
#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}/members/{user_id}",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("user_id" = Uuid, Path, description = "User to remove")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, description = "Cannot remove the admin"),
        (status = 403, description = "Only the admin can remove members"),
        (status = 404, description = "Member not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_member(
    State(state): State<AppState>,
    AuthUser(acting_id): AuthUser,
    Path((group_id, target_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse> {
    state
        .group_service
        .remove_member(&group_id, acting_id, target_id)
        .await?;
    // A removed member must stop receiving the group's snapshot stream.
    state.ws_connections.unsubscribe(&group_id, &target_id);

    Ok(StatusCode::NO_CONTENT)
}
