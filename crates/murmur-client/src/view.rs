//! Asynchronous driver for one open chat.
//!
//! A [`ChatView`] owns a [`Pager`], runs the pager's fetch requests as tokio
//! tasks and applies their outcomes, together with [`ChatEvent`]s, when its
//! owner awaits [`ChatView::next_update`].  All window mutation happens on
//! the owner's task; fetch tasks only ever send their result back.
//!
//! Opening a view acquires it; dropping it releases it.  `Drop` aborts the
//! in-flight fetch task, and because the completion channel is owned by the
//! view, a response that was already on its way has nowhere to land.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use murmur_shared::{ChatId, Message};

use crate::config::ClientConfig;
use crate::error::{FetchError, ViewError};
use crate::events::{self, ChatEvent, ChatEventSender};
use crate::pagination::{Applied, Created, FetchRequest, FetchTicket, Pager, ViewState};
use crate::source::MessageSource;
use crate::window::MessageWindow;

/// Scroll geometry of the message list, measured from the newest end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// How far the list is scrolled away from the newest message.
    pub offset: f32,
    /// Height of the visible area.
    pub viewport: f32,
    /// Height of all rendered messages.
    pub content: f32,
}

impl ScrollMetrics {
    /// Remaining distance before the oldest rendered message is fully shown.
    pub fn distance_to_old_end(&self) -> f32 {
        (self.content - self.viewport - self.offset).max(0.0)
    }

    pub fn reached_old_end(&self, threshold: f32) -> bool {
        self.distance_to_old_end() <= threshold
    }
}

/// Something observable changed after [`ChatView::next_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// A page was applied to the window.
    Loaded { added: usize },
    /// No older history exists.
    Exhausted,
    /// A fetch failed; the window is unchanged.
    Failed(ViewError),
    /// A created message was placed at the head (or buffered before the
    /// initial page).
    Created(Created),
    /// A held message was marked deleted.
    Deleted,
}

struct Completion {
    ticket: FetchTicket,
    outcome: Result<Vec<Message>, FetchError>,
}

pub struct ChatView {
    pager: Pager,
    source: Arc<dyn MessageSource>,
    fetch_timeout: Duration,
    scroll_threshold: f32,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    events_rx: mpsc::UnboundedReceiver<ChatEvent>,
    events_open: bool,
    in_flight: Option<AbortHandle>,
}

impl ChatView {
    /// Open a view on `chat_id` and start loading its most recent page.
    ///
    /// Must be called from within a tokio runtime.  The returned sender
    /// delivers [`ChatEvent`]s to this view only.
    pub fn open(
        chat_id: ChatId,
        source: Arc<dyn MessageSource>,
        config: &ClientConfig,
    ) -> (Self, ChatEventSender) {
        let (events_tx, events_rx) = events::channel(chat_id);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let mut view = Self {
            pager: Pager::new(chat_id, config.page_size),
            source,
            fetch_timeout: config.fetch_timeout,
            scroll_threshold: config.scroll_threshold_px,
            completions_tx,
            completions_rx,
            events_rx,
            events_open: true,
            in_flight: None,
        };

        info!(chat = %chat_id, "opening chat view");
        let request = view.pager.start();
        view.dispatch(request);
        (view, events_tx)
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    /// Report the current scroll position.  Returns `true` if a backward
    /// fetch was issued.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if !metrics.reached_old_end(self.scroll_threshold) {
            return false;
        }
        self.reached_old_end()
    }

    /// The oldest rendered message is in view.  Returns `true` if a backward
    /// fetch was issued.
    pub fn reached_old_end(&mut self) -> bool {
        let request = self.pager.reached_old_end();
        self.dispatch(request)
    }

    /// Retry the failed fetch.  Returns `true` if a fetch was issued.
    pub fn retry(&mut self) -> bool {
        let request = self.pager.retry();
        self.dispatch(request)
    }

    pub fn dismiss_error(&mut self) {
        self.pager.dismiss_error();
    }

    /// Start the initial load again after a dismissed initial failure.
    pub fn reload(&mut self) -> bool {
        let request = self.pager.start();
        self.dispatch(request)
    }

    /// Abort the in-flight fetch, if any.  Its result will be discarded.
    pub fn cancel_fetch(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.pager.cancel();
    }

    fn dispatch(&mut self, request: Option<FetchRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };

        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        let timeout = self.fetch_timeout;

        let task = tokio::spawn(async move {
            let fetch = source.fetch_messages(request.chat_id, request.before, request.limit);
            let outcome = match tokio::time::timeout(timeout, fetch).await {
                Ok(result) => result.map(|page| page.messages),
                Err(_) => Err(FetchError::Timeout(timeout)),
            };
            // The view may be gone already; then nobody wants the result.
            let _ = tx.send(Completion {
                ticket: request.ticket,
                outcome,
            });
        });

        self.in_flight = Some(task.abort_handle());
        true
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Wait for the next fetch completion or chat event and apply it.
    ///
    /// Returns `None` once nothing more can happen: the event sender is gone
    /// and no fetch is outstanding.
    pub async fn next_update(&mut self) -> Option<ViewUpdate> {
        loop {
            if !self.events_open && !self.pager.is_fetching() {
                return None;
            }

            let fetching = self.pager.is_fetching();
            tokio::select! {
                Some(done) = self.completions_rx.recv(), if fetching => {
                    if let Some(update) = self.apply_completion(done) {
                        return Some(update);
                    }
                }
                event = self.events_rx.recv(), if self.events_open => match event {
                    Some(event) => {
                        if let Some(update) = self.apply_event(event) {
                            return Some(update);
                        }
                    }
                    None => {
                        debug!(chat = %self.pager.chat_id(), "event sender closed");
                        self.events_open = false;
                    }
                },
            }
        }
    }

    fn apply_completion(&mut self, done: Completion) -> Option<ViewUpdate> {
        let applied = self.pager.complete(done.ticket, done.outcome);
        if !self.pager.is_fetching() {
            self.in_flight = None;
        }
        match applied {
            Applied::Loaded { added, .. } => Some(ViewUpdate::Loaded { added }),
            Applied::Exhausted => Some(ViewUpdate::Exhausted),
            Applied::Failed(e) => Some(ViewUpdate::Failed(e)),
            Applied::Discarded => None,
        }
    }

    fn apply_event(&mut self, event: ChatEvent) -> Option<ViewUpdate> {
        match event {
            ChatEvent::MessageCreated(message) => match self.pager.message_created(message) {
                Created::Ignored | Created::Duplicate => None,
                created => Some(ViewUpdate::Created(created)),
            },
            ChatEvent::MessageDeleted(id) => {
                self.pager.message_deleted(id).then_some(ViewUpdate::Deleted)
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn chat_id(&self) -> ChatId {
        self.pager.chat_id()
    }

    pub fn state(&self) -> ViewState {
        self.pager.state()
    }

    pub fn window(&self) -> &MessageWindow {
        self.pager.window()
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.pager.error()
    }

    pub fn is_fetching(&self) -> bool {
        self.pager.is_fetching()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more()
    }

    /// Tear the view down.  Equivalent to dropping it.
    pub fn close(self) {}
}

impl Drop for ChatView {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        debug!(chat = %self.pager.chat_id(), "chat view closed");
    }
}
