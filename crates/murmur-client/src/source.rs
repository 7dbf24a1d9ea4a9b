//! Where history pages and chat overviews come from.
//!
//! The core only depends on the two traits below.  [`StoreSource`] serves
//! them from the local SQLite store; [`HttpSource`] from the Murmur HTTP API.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use murmur_shared::{ChatId, MessageId, MessagePage, RawChat};
use murmur_store::Database;

use crate::config::ClientConfig;
use crate::error::{ClientError, FetchError};

/// Paged read of a chat's history.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Up to `limit` messages strictly older than `before` (or the most
    /// recent `limit` when `before` is `None`), newest first.
    async fn fetch_messages(
        &self,
        chat_id: ChatId,
        before: Option<MessageId>,
        limit: u32,
    ) -> Result<MessagePage, FetchError>;
}

/// Read of a chat with its participants' directory records.
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    async fn fetch_chat(&self, chat_id: ChatId) -> Result<RawChat, FetchError>;
}

// ---------------------------------------------------------------------------
// Local store
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct StoreSource {
    db: Arc<Mutex<Database>>,
}

impl StoreSource {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, FetchError> {
        self.db
            .lock()
            .map_err(|e| FetchError::Transport(format!("Lock poisoned: {e}")))
    }
}

#[async_trait]
impl MessageSource for StoreSource {
    async fn fetch_messages(
        &self,
        chat_id: ChatId,
        before: Option<MessageId>,
        limit: u32,
    ) -> Result<MessagePage, FetchError> {
        let messages = self.lock()?.get_messages_before(chat_id, before, limit)?;
        Ok(MessagePage::ok(messages))
    }
}

#[async_trait]
impl ChatDirectory for StoreSource {
    async fn fetch_chat(&self, chat_id: ChatId) -> Result<RawChat, FetchError> {
        Ok(self.lock()?.get_raw_chat(chat_id)?)
    }
}

// ---------------------------------------------------------------------------
// HTTP API
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Error body returned by the API: `{ "error": "..." }`.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Build a source for `config.api_url`, with the fetch timeout applied
    /// to every request as well.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config
            .api_url
            .as_deref()
            .ok_or_else(|| ClientError::Config("MURMUR_API_URL is not set".into()))?;
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            ..Self::new(base_url)
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn chat_url(&self, chat_id: ChatId) -> String {
        format!("{}/chats/{}", self.base_url, chat_id)
    }

    fn messages_url(&self, chat_id: ChatId) -> String {
        format!("{}/messages", self.chat_url(chat_id))
    }

    async fn get(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, FetchError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        Err(FetchError::Status {
            code: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MessageSource for HttpSource {
    async fn fetch_messages(
        &self,
        chat_id: ChatId,
        before: Option<MessageId>,
        limit: u32,
    ) -> Result<MessagePage, FetchError> {
        let mut request = self
            .client
            .get(self.messages_url(chat_id))
            .query(&[("limit", limit.to_string())]);
        if let Some(before) = before {
            request = request.query(&[("before", before.to_string())]);
        }

        let response = self.get(request).await?;
        let status = response.status().as_u16();
        let mut page: MessagePage = response.json().await?;
        page.status = status;

        debug!(chat = %chat_id, returned = page.messages.len(), "fetched history page");
        Ok(page)
    }
}

#[async_trait]
impl ChatDirectory for HttpSource {
    async fn fetch_chat(&self, chat_id: ChatId) -> Result<RawChat, FetchError> {
        let response = self.get(self.client.get(self.chat_url(chat_id))).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use murmur_shared::{Message, Preferences, UserId, UserRecord};
    use murmur_store::ChatRecord;

    fn seeded_store() -> (StoreSource, ChatId, Vec<Message>) {
        let db = Database::open_in_memory().unwrap();
        let chat = ChatRecord::new();
        db.create_chat(&chat).unwrap();

        let user = UserRecord {
            id: UserId::new(),
            account_tag: "alice".into(),
            preferences: Preferences::default(),
        };
        db.upsert_user(&user).unwrap();
        db.add_participant(chat.id, user.id, None).unwrap();

        let mut messages = Vec::new();
        for secs in 1..=7 {
            let m = Message {
                id: MessageId::new(),
                chat_id: chat.id,
                author: user.id,
                content: format!("#{secs}"),
                created_at: Utc.timestamp_opt(secs, 0).unwrap(),
                image_count: 0,
                replying_to: None,
                deleted: false,
            };
            db.insert_message(&m).unwrap();
            messages.push(m);
        }
        messages.reverse();
        (StoreSource::new(Arc::new(Mutex::new(db))), chat.id, messages)
    }

    #[tokio::test]
    async fn test_store_source_pages() {
        let (source, chat, newest_first) = seeded_store();

        let first = source.fetch_messages(chat, None, 3).await.unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.messages, newest_first[..3]);

        let cursor = first.messages.last().map(|m| m.id);
        let second = source.fetch_messages(chat, cursor, 3).await.unwrap();
        assert_eq!(second.messages, newest_first[3..6]);
    }

    #[tokio::test]
    async fn test_store_source_unknown_cursor() {
        let (source, chat, _) = seeded_store();
        let err = source
            .fetch_messages(chat, Some(MessageId::new()), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Store(_)));
    }

    #[tokio::test]
    async fn test_store_source_chat_overview() {
        let (source, chat, newest_first) = seeded_store();
        let raw = source.fetch_chat(chat).await.unwrap();
        assert_eq!(raw.participants.len(), 1);
        assert_eq!(raw.recent_message.as_ref(), newest_first.first());
    }

    #[test]
    fn test_http_source_requires_api_url() {
        let err = HttpSource::from_config(&ClientConfig::default()).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));

        let config = ClientConfig {
            api_url: Some("https://murmur.example/api".into()),
            ..ClientConfig::default()
        };
        let source = HttpSource::from_config(&config).unwrap();
        assert_eq!(source.base_url, "https://murmur.example/api");
    }

    #[test]
    fn test_http_urls() {
        let source = HttpSource::new("https://murmur.example/api/");
        let chat = ChatId(uuid::Uuid::nil());
        assert_eq!(
            source.messages_url(chat),
            "https://murmur.example/api/chats/00000000-0000-0000-0000-000000000000/messages"
        );
    }
}
