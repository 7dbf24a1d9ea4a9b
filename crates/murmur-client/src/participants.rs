//! Participant identity resolution.
//!
//! A participant's in-chat name is the first non-empty of their per-chat
//! nickname, their display name and their account tag.  The account tag is
//! the identity of last resort: a record without one is rejected instead of
//! being given a made-up name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use murmur_shared::{ChatId, ImageRef, Message, RawChat, RawParticipant, UserId};

use crate::error::ClientError;

/// Presence as reported by the (external) presence service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Idle,
    Dnd,
    Invisible,
}

// ---------------------------------------------------------------------------
// Participant / ChatOverview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    pub nickname: Option<String>,
    pub display_name: Option<String>,
    /// Never empty.
    pub account_tag: String,
    pub profile_image: Option<ImageRef>,
}

impl Participant {
    pub fn from_raw(raw: &RawParticipant) -> Result<Self, ClientError> {
        let account_tag = raw.user.account_tag.trim();
        if account_tag.is_empty() {
            return Err(ClientError::MalformedParticipant {
                user_id: raw.user.id,
            });
        }

        Ok(Self {
            user_id: raw.user.id,
            nickname: raw.nickname.clone(),
            display_name: raw.user.preferences.display_name.clone(),
            account_tag: account_tag.to_string(),
            profile_image: raw.user.preferences.profile_image.clone(),
        })
    }

    /// Nickname, else display name, else account tag.
    pub fn resolved_name(&self) -> &str {
        non_empty(&self.nickname)
            .or_else(|| non_empty(&self.display_name))
            .unwrap_or(self.account_tag.as_str())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A chat as the client core sees it: validated participants in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOverview {
    pub chat_id: ChatId,
    pub participants: Vec<Participant>,
    pub explicit_name: Option<String>,
    pub explicit_image: Option<ImageRef>,
    pub recent_message: Option<Message>,
}

impl ChatOverview {
    /// Validate a raw chat record.  Fails on an empty participant list or on
    /// the first malformed participant.
    pub fn from_raw(raw: &RawChat) -> Result<Self, ClientError> {
        let participants = raw
            .participants
            .iter()
            .map(Participant::from_raw)
            .collect::<Result<Vec<_>, _>>()?;

        if participants.is_empty() {
            return Err(ClientError::EmptyChat { chat_id: raw.id });
        }

        Ok(Self {
            chat_id: raw.id,
            participants,
            explicit_name: raw.name.clone(),
            explicit_image: raw.image.clone(),
            recent_message: raw.recent_message.clone(),
        })
    }

    pub fn participant(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }
}

// ---------------------------------------------------------------------------
// ParticipantMap
// ---------------------------------------------------------------------------

/// Display identity of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantIdentity {
    pub in_chat_name: String,
    pub status: Option<PresenceStatus>,
}

/// Snapshot of `user_id -> identity` for one chat overview fetch.
///
/// A new overview produces a new map; only the presence slot is patched in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantMap {
    entries: HashMap<UserId, ParticipantIdentity>,
}

impl ParticipantMap {
    pub fn from_overview(overview: &ChatOverview) -> Self {
        let entries = overview
            .participants
            .iter()
            .map(|p| {
                (
                    p.user_id,
                    ParticipantIdentity {
                        in_chat_name: p.resolved_name().to_string(),
                        status: None,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, user_id: UserId) -> Option<&ParticipantIdentity> {
        self.entries.get(&user_id)
    }

    pub fn name_of(&self, user_id: UserId) -> Option<&str> {
        self.entries.get(&user_id).map(|p| p.in_chat_name.as_str())
    }

    /// Update a participant's presence.  Returns `false` for unknown users.
    pub fn set_status(&mut self, user_id: UserId, status: Option<PresenceStatus>) -> bool {
        match self.entries.get_mut(&user_id) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &ParticipantIdentity)> {
        self.entries.iter()
    }
}

/// Resolve raw participant records into an identity map.
pub fn resolve_participants(raw: &[RawParticipant]) -> Result<ParticipantMap, ClientError> {
    let mut entries = HashMap::with_capacity(raw.len());
    for record in raw {
        let participant = Participant::from_raw(record)?;
        entries.insert(
            participant.user_id,
            ParticipantIdentity {
                in_chat_name: participant.resolved_name().to_string(),
                status: None,
            },
        );
    }
    Ok(ParticipantMap { entries })
}
