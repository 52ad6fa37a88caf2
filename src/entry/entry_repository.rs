use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::entry_models::DiaryEntry;

#[derive(Clone)]
pub struct EntryRepository {
    pool: PgPool,
}

impl EntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        group_id: &str,
        user_id: Uuid,
        author_name: &str,
        text: &str,
        mood: &str,
    ) -> Result<DiaryEntry> {
        let entry = sqlx::query_as::<_, DiaryEntry>(
            "INSERT INTO diary_entries (group_id, user_id, author_name, text, mood)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(author_name)
        .bind(text)
        .bind(mood)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// The full entry set for a group, oldest first. Filtering and
    /// re-sorting happen in the service layer.
    pub async fn list_for_group(&self, group_id: &str) -> Result<Vec<DiaryEntry>> {
        let entries = sqlx::query_as::<_, DiaryEntry>(
            "SELECT * FROM diary_entries WHERE group_id = $1 ORDER BY created_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
