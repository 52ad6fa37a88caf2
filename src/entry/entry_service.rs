use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::group::group_service::GroupService;
use crate::user::user_repository::UserRepository;
use crate::websocket::types::{EntrySnapshotPayload, WsMessage};
use crate::websocket::ConnectionManager;

use super::entry_dto::{CreateEntryRequest, DayGroup, EntriesResponse, EntryListQuery, SortOrder};
use super::entry_models::{is_valid_mood, DiaryEntry};
use super::entry_repository::EntryRepository;

/// Calendar date of a timestamp in the client's local time.
fn local_date(at: DateTime<Utc>, tz_offset_minutes: i32) -> NaiveDate {
    // The offset comes straight from the query string. Out-of-range or
    // overflowing values fall back to UTC rather than failing the request.
    let offset = tz_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());
    at.with_timezone(&offset).date_naive()
}

/// Applies author/mood/date filters and the requested sort order over the
/// full entry set. No pagination exists, so the whole set is in memory.
pub fn apply_filters(mut entries: Vec<DiaryEntry>, query: &EntryListQuery) -> Vec<DiaryEntry> {
    let tz_offset = query.tz_offset_minutes.unwrap_or(0);

    if let Some(author) = &query.author {
        entries.retain(|e| &e.author_name == author);
    }
    if let Some(mood) = &query.mood {
        entries.retain(|e| &e.mood == mood);
    }
    if let Some(date) = query.date {
        entries.retain(|e| local_date(e.created_at, tz_offset) == date);
    }

    match query.sort.unwrap_or_default() {
        SortOrder::Asc => entries.sort_by_key(|e| e.created_at),
        SortOrder::Desc => entries.sort_by_key(|e| std::cmp::Reverse(e.created_at)),
    }

    entries
}

/// Buckets already-sorted entries by calendar date, preserving entry order
/// inside each day. Day order follows the entry order, so a descending
/// sort yields the newest day first.
pub fn bucket_by_date(entries: Vec<DiaryEntry>, tz_offset_minutes: i32) -> Vec<DayGroup> {
    let mut days: Vec<DayGroup> = Vec::new();

    for entry in entries {
        let date = local_date(entry.created_at, tz_offset_minutes);
        match days.last_mut() {
            Some(day) if day.date == date => day.entries.push(entry),
            _ => days.push(DayGroup {
                date,
                entries: vec![entry],
            }),
        }
    }

    days
}

#[derive(Clone)]
pub struct EntryService {
    repo: EntryRepository,
    group_service: GroupService,
    user_repo: UserRepository,
    ws_manager: ConnectionManager,
}

impl EntryService {
    pub fn new(
        repo: EntryRepository,
        group_service: GroupService,
        user_repo: UserRepository,
        ws_manager: ConnectionManager,
    ) -> Self {
        Self {
            repo,
            group_service,
            user_repo,
            ws_manager,
        }
    }

    /// Submit a new entry. Approved members only; the author's display name
    /// is re-read from their profile at submission time ("Anonymous" if the
    /// profile is gone). Every subscriber of the group gets a fresh full
    /// snapshot afterwards.
    pub async fn submit_entry(
        &self,
        user_id: Uuid,
        group_id: &str,
        payload: CreateEntryRequest,
    ) -> Result<DiaryEntry> {
        if payload.text.trim().is_empty() {
            return Err(AppError::BadRequest("Entry text is empty".to_string()));
        }
        if !is_valid_mood(&payload.mood) {
            return Err(AppError::BadRequest(
                "Mood must be one of the mood palette emojis".to_string(),
            ));
        }

        self.group_service
            .require_approved_member(group_id, user_id)
            .await?;

        let author_name = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| "Anonymous".to_string());

        let entry = self
            .repo
            .create(group_id, user_id, &author_name, &payload.text, &payload.mood)
            .await?;

        // Push the updated snapshot to everyone watching this group.
        let snapshot = self.snapshot(group_id).await?;
        self.ws_manager.broadcast_to_group(group_id, snapshot);

        tracing::debug!(group_id = %group_id, entry_id = %entry.id, "Entry added");
        Ok(entry)
    }

    /// Full current snapshot of a group's entries, newest first, as a
    /// websocket message.
    pub async fn snapshot(&self, group_id: &str) -> Result<WsMessage> {
        let mut entries = self.repo.list_for_group(group_id).await?;
        entries.reverse(); // stored ascending; snapshot is newest first
        Ok(WsMessage::EntrySnapshot(EntrySnapshotPayload {
            group_id: group_id.to_string(),
            entries,
        }))
    }

    /// Filtered, sorted, date-bucketed view of a group's entries.
    pub async fn list_entries(
        &self,
        user_id: Uuid,
        group_id: &str,
        query: EntryListQuery,
    ) -> Result<EntriesResponse> {
        self.group_service
            .require_approved_member(group_id, user_id)
            .await?;

        let entries = self.repo.list_for_group(group_id).await?;
        let filtered = apply_filters(entries, &query);
        let total = filtered.len();
        let days = bucket_by_date(filtered, query.tz_offset_minutes.unwrap_or(0));

        Ok(EntriesResponse { total, days })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(author: &str, mood: &str, at: DateTime<Utc>) -> DiaryEntry {
        DiaryEntry {
            id: Uuid::new_v4(),
            group_id: "DG-TEST01".to_string(),
            user_id: Uuid::new_v4(),
            author_name: author.to_string(),
            text: "dear diary".to_string(),
            mood: mood.to_string(),
            created_at: at,
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn sort_newest_first_and_oldest_first() {
        let t1 = at(2024, 3, 1, 8);
        let t2 = at(2024, 3, 1, 12);
        let t3 = at(2024, 3, 2, 9);
        let entries = vec![
            entry("Ana", "😊", t2),
            entry("Ben", "✨", t3),
            entry("Ana", "😢", t1),
        ];

        let desc = apply_filters(entries.clone(), &EntryListQuery::default());
        let stamps: Vec<_> = desc.iter().map(|e| e.created_at).collect();
        assert_eq!(stamps, vec![t3, t2, t1]);

        let asc = apply_filters(
            entries,
            &EntryListQuery {
                sort: Some(SortOrder::Asc),
                ..Default::default()
            },
        );
        let stamps: Vec<_> = asc.iter().map(|e| e.created_at).collect();
        assert_eq!(stamps, vec![t1, t2, t3]);
    }

    #[test]
    fn filter_by_author_and_mood() {
        let entries = vec![
            entry("Ana", "😊", at(2024, 3, 1, 8)),
            entry("Ben", "😊", at(2024, 3, 1, 9)),
            entry("Ana", "✨", at(2024, 3, 1, 10)),
        ];

        let by_author = apply_filters(
            entries.clone(),
            &EntryListQuery {
                author: Some("Ana".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_author.len(), 2);
        assert!(by_author.iter().all(|e| e.author_name == "Ana"));

        let by_both = apply_filters(
            entries,
            &EntryListQuery {
                author: Some("Ana".to_string()),
                mood: Some("✨".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].mood, "✨");
    }

    #[test]
    fn filter_by_exact_date_across_mixed_dates() {
        let entries = vec![
            entry("Ana", "😊", at(2024, 3, 1, 8)),
            entry("Ben", "✨", at(2024, 3, 2, 9)),
            entry("Ana", "😴", at(2024, 3, 2, 23)),
            entry("Ben", "❤️", at(2024, 3, 3, 1)),
        ];

        let filtered = apply_filters(
            entries,
            &EntryListQuery {
                date: NaiveDate::from_ymd_opt(2024, 3, 2),
                ..Default::default()
            },
        );
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn date_filter_respects_timezone_offset() {
        // 23:30 UTC on Mar 1 is already Mar 2 at UTC+2.
        let entries = vec![entry("Ana", "😊", at(2024, 3, 1, 23))];

        let utc_match = apply_filters(
            entries.clone(),
            &EntryListQuery {
                date: NaiveDate::from_ymd_opt(2024, 3, 1),
                ..Default::default()
            },
        );
        assert_eq!(utc_match.len(), 1);

        let shifted = apply_filters(
            entries,
            &EntryListQuery {
                date: NaiveDate::from_ymd_opt(2024, 3, 2),
                tz_offset_minutes: Some(120),
                ..Default::default()
            },
        );
        assert_eq!(shifted.len(), 1);
    }

    #[test]
    fn extreme_timezone_offset_falls_back_to_utc() {
        let entries = vec![entry("Ana", "😊", at(2024, 3, 1, 23))];

        for offset in [i32::MAX, i32::MIN, 100_000] {
            let filtered = apply_filters(
                entries.clone(),
                &EntryListQuery {
                    date: NaiveDate::from_ymd_opt(2024, 3, 1),
                    tz_offset_minutes: Some(offset),
                    ..Default::default()
                },
            );
            assert_eq!(filtered.len(), 1, "offset {} should behave as UTC", offset);
        }
    }

    #[test]
    fn bucketing_groups_by_calendar_day_in_sort_order() {
        let entries = vec![
            entry("Ana", "😊", at(2024, 3, 1, 8)),
            entry("Ben", "✨", at(2024, 3, 1, 12)),
            entry("Ana", "😴", at(2024, 3, 2, 9)),
        ];

        let desc = apply_filters(entries, &EntryListQuery::default());
        let days = bucket_by_date(desc, 0);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(days[0].entries.len(), 1);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[1].entries.len(), 2);
        // Inside a day the requested (descending) order is preserved.
        assert!(days[1].entries[0].created_at > days[1].entries[1].created_at);
    }

    #[test]
    fn bucketing_empty_set() {
        assert!(bucket_by_date(Vec::new(), 0).is_empty());
    }
}
