use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::group_models::{Group, GroupMember};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinGroupRequest {
    #[validate(length(min = 1, max = 16))]
    pub group_id: String,
}

/// A group together with the calling user's own membership state, which is
/// what the UI needs to decide between the diary and the waiting screen.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    #[serde(flatten)]
    pub group: Group,
    pub my_role: String,
    pub my_approved: bool,
}

impl GroupResponse {
    pub fn new(group: Group, member: &GroupMember) -> Self {
        Self {
            group,
            my_role: member.role.clone(),
            my_approved: member.approved,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembersResponse {
    pub members: Vec<GroupMember>,
    pub pending: Vec<GroupMember>,
}

impl MembersResponse {
    pub fn split(all: Vec<GroupMember>) -> Self {
        let (members, pending) = all.into_iter().partition(|m| m.approved);
        Self { members, pending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn member(approved: bool) -> GroupMember {
        GroupMember {
            group_id: "DG-TEST01".to_string(),
            user_id: Uuid::new_v4(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            role: "member".to_string(),
            approved,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn split_separates_pending_from_approved() {
        let all = vec![member(true), member(false), member(true)];
        let response = MembersResponse::split(all);
        assert_eq!(response.members.len(), 2);
        assert_eq!(response.pending.len(), 1);
        assert!(response.members.iter().all(|m| m.approved));
        assert!(response.pending.iter().all(|m| !m.approved));
    }
}
