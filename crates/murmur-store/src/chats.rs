//! CRUD operations for chats and their participants.

use rusqlite::{params, OptionalExtension};

use murmur_shared::{ChatId, ImageRef, RawChat, RawParticipant, UserId};

use crate::database::{format_ts, parse_id, parse_ts, Database};
use crate::error::{Result, StoreError};
use crate::models::ChatRecord;
use crate::users::row_to_user;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new chat.
    pub fn create_chat(&self, chat: &ChatRecord) -> Result<()> {
        self.conn().execute(
            "INSERT INTO chats (id, name, image_id, image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                chat.id.to_string(),
                chat.name,
                chat.image.as_ref().map(|i| i.id.as_str()),
                chat.image.as_ref().map(|i| i.url.as_str()),
                format_ts(&chat.created_at),
            ],
        )?;
        Ok(())
    }

    /// Add a user to a chat.  Participants keep the order in which they were
    /// added; adding an existing member only updates the nickname.
    pub fn add_participant(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        nickname: Option<&str>,
    ) -> Result<()> {
        self.conn().execute(
            "INSERT INTO chat_participants (chat_id, user_id, nickname, position)
             VALUES (?1, ?2, ?3,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM chat_participants WHERE chat_id = ?1))
             ON CONFLICT(chat_id, user_id) DO UPDATE SET nickname = excluded.nickname",
            params![chat_id.to_string(), user_id.to_string(), nickname],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single chat row.
    pub fn get_chat(&self, id: ChatId) -> Result<ChatRecord> {
        self.conn()
            .query_row(
                "SELECT id, name, image_id, image_url, created_at
                 FROM chats
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_chat,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List a chat's participants in join order, joined with their user rows.
    pub fn list_participants(&self, chat_id: ChatId) -> Result<Vec<RawParticipant>> {
        let mut stmt = self.conn().prepare(
            "SELECT u.id, u.account_tag, u.display_name, u.profile_image_id, u.profile_image_url,
                    p.nickname
             FROM chat_participants p
             JOIN users u ON u.id = p.user_id
             WHERE p.chat_id = ?1
             ORDER BY p.position ASC",
        )?;

        let rows = stmt.query_map(params![chat_id.to_string()], |row| {
            Ok(RawParticipant {
                user: row_to_user(row, 0)?,
                nickname: row.get(5)?,
            })
        })?;

        let mut participants = Vec::new();
        for row in rows {
            participants.push(row?);
        }
        Ok(participants)
    }

    /// Assemble the overview record the client resolves titles and chat heads
    /// from: chat row, ordered participants and the most recent message.
    pub fn get_raw_chat(&self, id: ChatId) -> Result<RawChat> {
        let chat = self.get_chat(id)?;
        let participants = self.list_participants(id)?;
        let recent_message = self.get_messages_before(id, None, 1)?.into_iter().next();

        Ok(RawChat {
            id: chat.id,
            name: chat.name,
            image: chat.image,
            participants,
            recent_message,
        })
    }

    /// Whether `user_id` is a member of `chat_id`.
    pub fn is_participant(&self, chat_id: ChatId, user_id: UserId) -> Result<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT 1 FROM chat_participants WHERE chat_id = ?1 AND user_id = ?2",
                params![chat_id.to_string(), user_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Remove a user from a chat.  Returns `true` if a row was deleted.
    pub fn remove_participant(&self, chat_id: ChatId, user_id: UserId) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM chat_participants WHERE chat_id = ?1 AND user_id = ?2",
            params![chat_id.to_string(), user_id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`ChatRecord`].
fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatRecord> {
    let id_str: String = row.get(0)?;
    let name: Option<String> = row.get(1)?;
    let image_id: Option<String> = row.get(2)?;
    let image_url: Option<String> = row.get(3)?;
    let created_str: String = row.get(4)?;

    let image = match (image_id, image_url) {
        (Some(id), Some(url)) => Some(ImageRef {
            id,
            url,
            alt: String::new(),
        }),
        _ => None,
    };

    Ok(ChatRecord {
        id: parse_id(0, &id_str)?,
        name,
        image,
        created_at: parse_ts(4, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_shared::{Preferences, UserRecord};

    fn seed_user(db: &Database, tag: &str) -> UserId {
        let user = UserRecord {
            id: UserId::new(),
            account_tag: tag.to_string(),
            preferences: Preferences::default(),
        };
        db.upsert_user(&user).unwrap();
        user.id
    }

    #[test]
    fn test_participants_keep_join_order() {
        let db = Database::open_in_memory().unwrap();
        let chat = ChatRecord::new();
        db.create_chat(&chat).unwrap();

        let carol = seed_user(&db, "carol");
        let alice = seed_user(&db, "alice");
        let bob = seed_user(&db, "bob");
        db.add_participant(chat.id, carol, None).unwrap();
        db.add_participant(chat.id, alice, Some("Al")).unwrap();
        db.add_participant(chat.id, bob, None).unwrap();

        let participants = db.list_participants(chat.id).unwrap();
        let tags: Vec<_> = participants
            .iter()
            .map(|p| p.user.account_tag.as_str())
            .collect();
        assert_eq!(tags, ["carol", "alice", "bob"]);
        assert_eq!(participants[1].nickname.as_deref(), Some("Al"));
    }

    #[test]
    fn test_re_adding_participant_updates_nickname_only() {
        let db = Database::open_in_memory().unwrap();
        let chat = ChatRecord::new();
        db.create_chat(&chat).unwrap();
        let alice = seed_user(&db, "alice");
        let bob = seed_user(&db, "bob");
        db.add_participant(chat.id, alice, None).unwrap();
        db.add_participant(chat.id, bob, None).unwrap();
        db.add_participant(chat.id, alice, Some("Ali")).unwrap();

        let participants = db.list_participants(chat.id).unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].user.id, alice);
        assert_eq!(participants[0].nickname.as_deref(), Some("Ali"));
    }

    #[test]
    fn test_raw_chat_without_messages() {
        let db = Database::open_in_memory().unwrap();
        let mut chat = ChatRecord::new();
        chat.name = Some("Climbing".into());
        db.create_chat(&chat).unwrap();
        let alice = seed_user(&db, "alice");
        db.add_participant(chat.id, alice, None).unwrap();

        let raw = db.get_raw_chat(chat.id).unwrap();
        assert_eq!(raw.name.as_deref(), Some("Climbing"));
        assert_eq!(raw.participants.len(), 1);
        assert!(raw.recent_message.is_none());
        assert!(db.is_participant(chat.id, alice).unwrap());
        assert!(db.remove_participant(chat.id, alice).unwrap());
        assert!(!db.is_participant(chat.id, alice).unwrap());
    }

    #[test]
    fn test_get_missing_chat() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_chat(ChatId::new()), Err(StoreError::NotFound)));
    }
}
