use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Group {
    /// Short shareable code, e.g. `DG-7KQ2ZP`.
    pub id: String,
    pub name: String,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Membership row. Name and email are snapshots captured when the user
/// joined (or created the group) and are preserved through approval.
/// `approved = false` marks a pending join request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GroupMember {
    pub group_id: String,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String, // "admin" or "member"
    pub approved: bool,
    pub joined_at: DateTime<Utc>,
}

/// A group as seen from one user's profile: the group plus that user's
/// role and approval state in it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserGroup {
    pub group_id: String,
    pub name: String,
    pub admin_id: Uuid,
    pub role: String,
    pub approved: bool,
    pub joined_at: DateTime<Utc>,
}
