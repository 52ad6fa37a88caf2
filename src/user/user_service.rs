use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::group::group_repository::GroupRepository;

use super::user_dto::ProfileResponse;
use super::user_repository::UserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    group_repo: GroupRepository,
}

impl UserService {
    pub fn new(repo: UserRepository, group_repo: GroupRepository) -> Self {
        Self { repo, group_repo }
    }

    pub async fn get_current_user(&self, user_id: Uuid) -> Result<ProfileResponse> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let groups = self.group_repo.find_user_groups(user_id).await?;

        Ok(ProfileResponse {
            user: user.into(),
            groups,
        })
    }

    /// Persists the last opened group. A convenience only: the stored value
    /// is never trusted as a membership claim, and the caller must actually
    /// be a member of the group being stored.
    pub async fn update_last_group(&self, user_id: Uuid, group_id: Option<&str>) -> Result<()> {
        if let Some(gid) = group_id {
            self.group_repo
                .find_member(gid, user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Group not found in your groups".to_string()))?;
        }

        self.repo.update_last_group(user_id, group_id).await
    }
}
