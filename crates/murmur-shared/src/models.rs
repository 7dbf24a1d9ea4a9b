//! Records exchanged between the store, the HTTP API and the client core.
//!
//! Everything derives `Serialize`/`Deserialize` with camelCase field names so
//! the same structs can be decoded straight from API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PROFILE_IMAGE_ID, DEFAULT_PROFILE_IMAGE_URL};
use crate::types::{ChatId, MessageId, UserId};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub author: UserId,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Number of images attached to the message.
    #[serde(default)]
    pub image_count: u32,
    /// The message this one replies to, if any.
    #[serde(default)]
    pub replying_to: Option<MessageId>,
    #[serde(default)]
    pub deleted: bool,
}

impl Message {
    /// Total order used for history: creation time, then id for equal times.
    pub fn sort_key(&self) -> (DateTime<Utc>, MessageId) {
        (self.created_at, self.id)
    }

    /// Whether `self` sorts strictly before `other` in time.
    pub fn is_older_than(&self, other: &Message) -> bool {
        self.sort_key() < other.sort_key()
    }
}

/// One page of history as returned by a message source, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// HTTP-style status of the read (200 for local reads).
    #[serde(default = "ok_status")]
    pub status: u16,
}

fn ok_status() -> u16 {
    200
}

impl MessagePage {
    pub fn ok(messages: Vec<Message>) -> Self {
        Self {
            messages,
            status: ok_status(),
        }
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

impl ImageRef {
    /// The well-known placeholder avatar.
    pub fn placeholder(alt: impl Into<String>) -> Self {
        Self {
            id: DEFAULT_PROFILE_IMAGE_ID.to_string(),
            url: DEFAULT_PROFILE_IMAGE_URL.to_string(),
            alt: alt.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == DEFAULT_PROFILE_IMAGE_ID
    }
}

// ---------------------------------------------------------------------------
// Directory records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<ImageRef>,
}

/// A user as supplied by the participant directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Unique handle; the identity of last resort. Empty means malformed.
    #[serde(default)]
    pub account_tag: String,
    #[serde(default)]
    pub preferences: Preferences,
}

/// A user's membership in one chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipant {
    pub user: UserRecord,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// A chat as supplied by the chat overview read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawChat {
    #[serde(alias = "_id")]
    pub id: ChatId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    pub participants: Vec<RawParticipant>,
    #[serde(default)]
    pub recent_message: Option<Message>,
}
