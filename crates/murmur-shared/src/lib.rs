// Types shared between the Murmur store and client crates.

pub mod constants;
pub mod error;
pub mod models;
pub mod types;

pub use error::SharedError;
pub use models::{ImageRef, Message, MessagePage, Preferences, RawChat, RawParticipant, UserRecord};
pub use types::{ChatId, MessageId, UserId};
