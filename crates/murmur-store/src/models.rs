//! Store-side records that have no direct counterpart in `murmur-shared`.
//!
//! Users, participants and messages are persisted as the shared
//! [`UserRecord`](murmur_shared::UserRecord),
//! [`RawParticipant`](murmur_shared::RawParticipant) and
//! [`Message`](murmur_shared::Message) types.

use chrono::{DateTime, Utc};

use murmur_shared::{ChatId, ImageRef};

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A chat row without its participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    /// Unique chat identifier.
    pub id: ChatId,
    /// Explicit title chosen by a member; `None` means "derive from members".
    pub name: Option<String>,
    /// Explicit chat image; `None` means "compose from member avatars".
    pub image: Option<ImageRef>,
    /// When the chat was created.
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    /// A new unnamed chat created now.
    pub fn new() -> Self {
        Self {
            id: ChatId::new(),
            name: None,
            image: None,
            created_at: Utc::now(),
        }
    }
}

impl Default for ChatRecord {
    fn default() -> Self {
        Self::new()
    }
}
