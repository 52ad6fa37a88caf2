use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::group::group_models::UserGroup;

use super::user_models::UserResponse;

/// Profile plus every group visible to the user, pending memberships
/// included (a pending group shows up so the user can see its status).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub groups: Vec<UserGroup>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLastGroupRequest {
    /// `null` clears the stored group.
    #[validate(length(max = 16))]
    pub group_id: Option<String>,
}
