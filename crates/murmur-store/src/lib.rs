//! # murmur-store
//!
//! Local SQLite storage for Murmur chats.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed helpers for users, chats,
//! chat participants and messages.  Message history is read with keyset
//! (cursor) pagination so consecutive pages never overlap or leave gaps.

pub mod chats;
pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
