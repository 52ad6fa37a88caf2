use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::group_models::{Group, GroupMember, UserGroup, ROLE_ADMIN, ROLE_MEMBER};

#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the group and its admin membership row in one transaction,
    /// so a group can never exist without an approved admin member.
    pub async fn create_with_admin(
        &self,
        group_id: &str,
        name: &str,
        admin_id: Uuid,
        admin_name: &str,
        admin_email: &str,
    ) -> Result<Group> {
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, Group>(
            "INSERT INTO groups (id, name, admin_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(group_id)
        .bind(name)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, name, email, role, approved)
             VALUES ($1, $2, $3, $4, $5, TRUE)",
        )
        .bind(group_id)
        .bind(admin_id)
        .bind(admin_name)
        .bind(admin_email)
        .bind(ROLE_ADMIN)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(group)
    }

    pub async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    pub async fn find_member(&self, group_id: &str, user_id: Uuid) -> Result<Option<GroupMember>> {
        let member = sqlx::query_as::<_, GroupMember>(
            "SELECT * FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn add_pending_member(
        &self,
        group_id: &str,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<GroupMember> {
        let member = sqlx::query_as::<_, GroupMember>(
            "INSERT INTO group_members (group_id, user_id, name, email, role, approved)
             VALUES ($1, $2, $3, $4, $5, FALSE)
             RETURNING *",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(ROLE_MEMBER)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Flips a pending row to approved. The predicate makes the write a
    /// no-op for rows that are already approved, so concurrent approvals
    /// cannot clobber each other.
    pub async fn approve_member(&self, group_id: &str, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE group_members SET approved = TRUE
             WHERE group_id = $1 AND user_id = $2 AND approved = FALSE",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a pending row only; approved members are never touched.
    pub async fn remove_pending_member(&self, group_id: &str, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM group_members
             WHERE group_id = $1 AND user_id = $2 AND approved = FALSE",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a membership row. The role predicate protects the admin row
    /// even if the service-level check is bypassed.
    pub async fn remove_member(&self, group_id: &str, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM group_members
             WHERE group_id = $1 AND user_id = $2 AND role <> $3",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(ROLE_ADMIN)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_members(&self, group_id: &str) -> Result<Vec<GroupMember>> {
        let members = sqlx::query_as::<_, GroupMember>(
            "SELECT * FROM group_members WHERE group_id = $1 ORDER BY joined_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// All groups visible to a user, pending memberships included.
    pub async fn find_user_groups(&self, user_id: Uuid) -> Result<Vec<UserGroup>> {
        let groups = sqlx::query_as::<_, UserGroup>(
            "SELECT g.id AS group_id, g.name, g.admin_id, gm.role, gm.approved, gm.joined_at
             FROM groups g
             INNER JOIN group_members gm ON g.id = gm.group_id
             WHERE gm.user_id = $1
             ORDER BY gm.joined_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Group deletion. Membership rows and diary entries go with the group
    /// via FK cascade, all in one implicit transaction.
    pub async fn delete(&self, group_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
