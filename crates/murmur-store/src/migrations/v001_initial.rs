//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `users`, `chats`, `chat_participants` and
//! `messages`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id                TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    account_tag       TEXT NOT NULL,              -- unique handle
    display_name      TEXT,
    profile_image_id  TEXT,
    profile_image_url TEXT,
    created_at        TEXT NOT NULL               -- RFC-3339, microseconds, UTC
);

-- ----------------------------------------------------------------
-- Chats
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chats (
    id         TEXT PRIMARY KEY NOT NULL,         -- UUID v4
    name       TEXT,                              -- explicit title, nullable
    image_id   TEXT,
    image_url  TEXT,
    created_at TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Chat participants
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chat_participants (
    chat_id  TEXT NOT NULL,                       -- FK -> chats(id)
    user_id  TEXT NOT NULL,                       -- FK -> users(id)
    nickname TEXT,
    position INTEGER NOT NULL,                    -- join order

    PRIMARY KEY (chat_id, user_id),
    FOREIGN KEY (chat_id) REFERENCES chats(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id          TEXT PRIMARY KEY NOT NULL,        -- UUID v4
    chat_id     TEXT NOT NULL,                    -- FK -> chats(id)
    author_id   TEXT NOT NULL,
    content     TEXT NOT NULL,
    image_count INTEGER NOT NULL DEFAULT 0,
    replying_to TEXT,
    deleted     INTEGER NOT NULL DEFAULT 0,       -- boolean 0/1
    created_at  TEXT NOT NULL,

    FOREIGN KEY (chat_id) REFERENCES chats(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_chat_created
    ON messages(chat_id, created_at DESC, id DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
