use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entry::entry_models::DiaryEntry;

/// Server-to-client messages. Entry delivery is snapshot-based: every
/// change to a watched group re-sends the full current entry set and the
/// client replaces its local copy, so no diffing is needed on either side.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    EntrySnapshot(EntrySnapshotPayload),
    Subscribed(SubscriptionPayload),
    Unsubscribed(SubscriptionPayload),
    Error(ErrorPayload),
    Ping,
    Pong,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntrySnapshotPayload {
    pub group_id: String,
    pub entries: Vec<DiaryEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionPayload {
    pub group_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorPayload {
    pub message: String,
}

// Client-to-server messages
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { group_id: String },
    Unsubscribe { group_id: String },
    Ping,
}
