use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    entry::entry_dto::{CreateEntryRequest, EntriesResponse, EntryListQuery},
    entry::entry_models::DiaryEntry,
    error::Result,
    middleware::AuthUser,
    state::AppState,
};

/// Add a diary entry to a group (approved members only)
#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/entries",
    tag = "entries",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = DiaryEntry),
        (status = 400, description = "Empty text or invalid mood"),
        (status = 403, description = "Not an approved member"),
        (status = 404, description = "Group not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<String>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let entry = state
        .entry_service
        .submit_entry(user_id, &group_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// List a group's entries, filtered and grouped by calendar date
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/entries",
    tag = "entries",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        EntryListQuery
    ),
    responses(
        (status = 200, description = "Entries grouped by day", body = EntriesResponse),
        (status = 403, description = "Not an approved member"),
        (status = 404, description = "Group not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<String>,
    Query(query): Query<EntryListQuery>,
) -> Result<impl IntoResponse> {
    let entries = state
        .entry_service
        .list_entries(user_id, &group_id, query)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}
