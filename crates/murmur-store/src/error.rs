use thiserror::Error;

use murmur_shared::MessageId;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure, including ids and timestamps that fail to decode.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No row matched the requested id.
    #[error("Record not found")]
    NotFound,

    /// The `before` cursor is not a message of the requested chat.
    #[error("Unknown history cursor: {0}")]
    UnknownCursor(MessageId),

    /// A schema migration step failed; the previous version is kept.
    #[error("Migration failed: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
