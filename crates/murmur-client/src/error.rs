use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use murmur_shared::{ChatId, UserId};
use murmur_store::StoreError;

/// Errors raised synchronously by the client core.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A participant record has no account tag to fall back on.
    #[error("Malformed participant {user_id}: missing account tag")]
    MalformedParticipant { user_id: UserId },

    /// A chat record lists no participants at all.
    #[error("Chat {chat_id} has no participants")]
    EmptyChat { chat_id: ChatId },

    /// The chat view behind an event sender has been closed.
    #[error("Chat view closed")]
    ViewClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors produced while reading a page of history or a chat overview.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed with status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Superseded by view teardown or a chat switch.  Never shown to users.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status {
                code: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A fetch failure as the UI renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewError {
    pub message: String,
    pub status: Option<u16>,
}

impl From<&FetchError> for ViewError {
    fn from(e: &FetchError) -> Self {
        let status = match e {
            FetchError::Status { code, .. } => Some(*code),
            FetchError::Store(StoreError::NotFound) => Some(404),
            FetchError::Store(StoreError::UnknownCursor(_)) => Some(400),
            FetchError::Timeout(_) => Some(408),
            _ => None,
        };
        Self {
            message: e.to_string(),
            status,
        }
    }
}
