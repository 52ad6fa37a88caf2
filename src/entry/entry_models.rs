use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// The fixed mood palette. Entries carry exactly one of these.
pub const MOODS: [&str; 6] = ["😊", "😢", "😡", "✨", "❤️", "😴"];

pub fn is_valid_mood(mood: &str) -> bool {
    MOODS.contains(&mood)
}

/// A diary entry. Immutable once written: there is no update or delete.
/// `author_name` is a display-name snapshot taken at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub group_id: String,
    pub user_id: Uuid,
    pub author_name: String,
    pub text: String,
    pub mood: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_palette() {
        assert!(is_valid_mood("✨"));
        assert!(is_valid_mood("😴"));
        assert!(!is_valid_mood("🎉"));
        assert!(!is_valid_mood(""));
        assert!(!is_valid_mood("happy"));
    }
}
