use rusqlite::{params, OptionalExtension};

use murmur_shared::{ChatId, Message, MessageId};

use crate::database::{format_ts, parse_id, parse_ts, Database};
use crate::error::{Result, StoreError};

const MESSAGE_COLUMNS: &str =
    "id, chat_id, author_id, content, image_count, replying_to, deleted, created_at";

impl Database {
    pub fn insert_message(&self, message: &Message) -> Result<()> {
        self.conn().execute(
            "INSERT INTO messages (id, chat_id, author_id, content, image_count, replying_to, deleted, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                message.id.to_string(),
                message.chat_id.to_string(),
                message.author.to_string(),
                message.content,
                message.image_count,
                message.replying_to.map(|id| id.to_string()),
                message.deleted,
                format_ts(&message.created_at),
            ],
        )?;
        Ok(())
    }

    /// Read one page of a chat's history, newest first.
    ///
    /// With `before = None` this is the most recent `limit` messages.
    /// Otherwise it is the `limit` messages strictly older than the cursor
    /// message, ordered by `(created_at, id)` descending, so consecutive pages
    /// are contiguous even when timestamps collide.
    pub fn get_messages_before(
        &self,
        chat_id: ChatId,
        before: Option<MessageId>,
        limit: u32,
    ) -> Result<Vec<Message>> {
        let rows = match before {
            None => {
                let mut stmt = self.conn().prepare(&format!(
                    "SELECT {MESSAGE_COLUMNS}
                     FROM messages
                     WHERE chat_id = ?1
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?2"
                ))?;
                let rows = stmt.query_map(params![chat_id.to_string(), limit], row_to_message)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            Some(cursor) => {
                let anchor: Option<String> = self
                    .conn()
                    .query_row(
                        "SELECT created_at FROM messages WHERE id = ?1 AND chat_id = ?2",
                        params![cursor.to_string(), chat_id.to_string()],
                        |row| row.get(0),
                    )
                    .optional()?;
                let anchor_ts = anchor.ok_or(StoreError::UnknownCursor(cursor))?;

                let mut stmt = self.conn().prepare(&format!(
                    "SELECT {MESSAGE_COLUMNS}
                     FROM messages
                     WHERE chat_id = ?1
                       AND (created_at < ?2 OR (created_at = ?2 AND id < ?3))
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?4"
                ))?;
                let rows = stmt.query_map(
                    params![chat_id.to_string(), anchor_ts, cursor.to_string(), limit],
                    row_to_message,
                )?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        tracing::debug!(
            chat = %chat_id,
            before = ?before,
            limit,
            returned = rows.len(),
            "read history page"
        );
        Ok(rows)
    }

    pub fn get_message_by_id(&self, id: MessageId) -> Result<Message> {
        self.conn()
            .query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
                params![id.to_string()],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Soft-delete: the row stays so pagination cursors remain valid.
    pub fn mark_message_deleted(&self, id: MessageId) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE messages SET deleted = 1, content = '' WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }

    pub fn count_messages(&self, chat_id: ChatId) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM messages WHERE chat_id = ?1",
            params![chat_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let chat_id_str: String = row.get(1)?;
    let author_str: String = row.get(2)?;
    let content: String = row.get(3)?;
    let image_count: u32 = row.get(4)?;
    let replying_to_str: Option<String> = row.get(5)?;
    let deleted: bool = row.get(6)?;
    let ts_str: String = row.get(7)?;

    let replying_to = replying_to_str
        .map(|s| parse_id(5, &s))
        .transpose()?;

    Ok(Message {
        id: parse_id(0, &id_str)?,
        chat_id: parse_id(1, &chat_id_str)?,
        author: parse_id(2, &author_str)?,
        content,
        created_at: parse_ts(7, &ts_str)?,
        image_count,
        replying_to,
        deleted,
    })
}
