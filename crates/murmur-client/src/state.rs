//! Client application state.
//!
//! [`AppState`] holds the signed-in user, the configuration and at most one
//! open [`ChatView`].  Opening another chat drops the current view, which
//! aborts its outstanding fetch and closes its event channel.

use std::sync::Arc;

use murmur_shared::{ChatId, RawChat, UserId};

use crate::chat_name::ChatNameOptions;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::ChatEventSender;
use crate::source::MessageSource;
use crate::summary::ChatSummary;
use crate::view::ChatView;

/// Central client state.
pub struct AppState {
    /// The viewing user.  Left out of derived chat titles and chat heads.
    pub active_user: UserId,

    pub config: ClientConfig,

    source: Arc<dyn MessageSource>,

    /// The chat currently on screen, with the sender feeding its events.
    open: Option<(ChatView, ChatEventSender)>,
}

impl AppState {
    pub fn new(active_user: UserId, config: ClientConfig, source: Arc<dyn MessageSource>) -> Self {
        Self {
            active_user,
            config,
            source,
            open: None,
        }
    }

    /// Name options derived from the configuration.
    pub fn name_options(&self) -> ChatNameOptions {
        ChatNameOptions {
            number_to_combine: self.config.names_to_combine,
            ..ChatNameOptions::default()
        }
    }

    /// Summarise a raw chat record for the active user.
    pub fn summarize(&self, raw: &RawChat) -> Result<ChatSummary, ClientError> {
        ChatSummary::build(raw, self.active_user, self.name_options())
    }

    /// Open `chat_id`, tearing down whichever view was open before.
    ///
    /// Re-opening the chat that is already open keeps the existing view.
    /// Returns the event sender for the (new or kept) view.
    pub fn open_chat(&mut self, chat_id: ChatId) -> ChatEventSender {
        if let Some((view, events)) = &self.open {
            if view.chat_id() == chat_id {
                return events.clone();
            }
        }

        if let Some((previous, _)) = self.open.take() {
            tracing::info!(from = %previous.chat_id(), to = %chat_id, "switching chat");
            previous.close();
        }

        let (view, events) = ChatView::open(chat_id, Arc::clone(&self.source), &self.config);
        self.open = Some((view, events.clone()));
        events
    }

    /// Close the open chat, if any.
    pub fn close_chat(&mut self) {
        if let Some((view, _)) = self.open.take() {
            view.close();
        }
    }

    pub fn view(&self) -> Option<&ChatView> {
        self.open.as_ref().map(|(view, _)| view)
    }

    pub fn view_mut(&mut self) -> Option<&mut ChatView> {
        self.open.as_mut().map(|(view, _)| view)
    }

    pub fn open_chat_id(&self) -> Option<ChatId> {
        self.view().map(ChatView::chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::pagination::ViewState;
    use crate::view::ViewUpdate;
    use crate::window::tests::page;
    use async_trait::async_trait;
    use murmur_shared::{MessageId, MessagePage};
    use std::future;

    /// Answers every fetch with the same page, or never when `stall` is set.
    struct FixedSource {
        page: Vec<murmur_shared::Message>,
        stall: bool,
    }

    #[async_trait]
    impl MessageSource for FixedSource {
        async fn fetch_messages(
            &self,
            _chat_id: ChatId,
            before: Option<MessageId>,
            _limit: u32,
        ) -> Result<MessagePage, FetchError> {
            if self.stall {
                future::pending::<()>().await;
            }
            match before {
                None => Ok(MessagePage::ok(self.page.clone())),
                Some(_) => Ok(MessagePage::ok(Vec::new())),
            }
        }
    }

    fn state(stall: bool, chat: ChatId) -> AppState {
        let source = Arc::new(FixedSource {
            page: page(chat, 3, 1),
            stall,
        });
        AppState::new(UserId::new(), ClientConfig::default(), source)
    }

    #[tokio::test]
    async fn test_open_chat_loads_history() {
        let chat = ChatId::new();
        let mut state = state(false, chat);
        let _events = state.open_chat(chat);

        let view = state.view_mut().unwrap();
        assert_eq!(view.next_update().await, Some(ViewUpdate::Loaded { added: 3 }));
        assert_eq!(view.state(), ViewState::Ready);
        assert_eq!(state.open_chat_id(), Some(chat));
    }

    #[tokio::test]
    async fn test_switching_chat_tears_down_previous_view() {
        let first = ChatId::new();
        let second = ChatId::new();
        let mut state = state(true, first);

        let first_events = state.open_chat(first);
        assert!(state.view().unwrap().is_fetching());

        let again = state.open_chat(first);
        assert!(!again.is_closed());

        let second_events = state.open_chat(second);
        assert!(first_events.is_closed());
        assert!(!second_events.is_closed());
        assert_eq!(state.open_chat_id(), Some(second));

        state.close_chat();
        assert!(second_events.is_closed());
        assert!(state.view().is_none());
    }

    #[test]
    fn test_name_options_follow_config() {
        let chat = ChatId::new();
        let mut state = state(false, chat);
        state.config.names_to_combine = 5;
        assert_eq!(state.name_options().number_to_combine, 5);
        assert!(state.name_options().ignore_active_user);
    }
}
