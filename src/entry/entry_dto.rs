use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entry_models::DiaryEntry;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1))]
    pub text: String,
    pub mood: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Entry list filters. All optional; filtering happens in-process over the
/// group's full entry set.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EntryListQuery {
    /// Exact author display name.
    pub author: Option<String>,
    /// One mood from the fixed palette.
    pub mood: Option<String>,
    /// Exact calendar date (YYYY-MM-DD) in the client's local time.
    pub date: Option<NaiveDate>,
    /// Minutes east of UTC for calendar-date bucketing. Defaults to 0.
    pub tz_offset_minutes: Option<i32>,
    pub sort: Option<SortOrder>,
}

/// Entries for one calendar day, in the requested sort order.
#[derive(Debug, Serialize, ToSchema)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub entries: Vec<DiaryEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntriesResponse {
    pub total: usize,
    pub days: Vec<DayGroup>,
}
