//! History pagination state machine for one chat view.
//!
//! ```text
//! Idle            --start-------------> FetchingInitial
//! FetchingInitial --ok----------------> Ready
//! FetchingInitial --err---------------> Error
//! Ready           --reached old end---> FetchingMore
//! FetchingMore    --ok / empty page---> Ready
//! FetchingMore    --err---------------> Error
//! Error           --retry-------------> FetchingInitial | FetchingMore
//! Error           --dismiss-----------> Ready | Idle
//! ```
//!
//! The [`Pager`] performs no I/O.  It hands out [`FetchRequest`]s and is fed
//! their outcomes through [`Pager::complete`].  Every request carries a
//! [`FetchTicket`]; only the ticket of the single outstanding request is
//! accepted, so responses that arrive after [`Pager::cancel`] (or after a
//! newer request replaced them) are discarded without touching the window.

use murmur_shared::{ChatId, Message, MessageId};

use crate::error::{FetchError, ViewError};
use crate::window::MessageWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    FetchingInitial,
    Ready,
    FetchingMore,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Most recent page, no cursor.
    Initial,
    /// Page strictly older than the current tail.
    Older,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    seq: u64,
    kind: FetchKind,
}

impl FetchTicket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// A page read the caller must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub chat_id: ChatId,
    pub before: Option<MessageId>,
    pub limit: u32,
}

/// What [`Pager::complete`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Messages were added to the window.
    Loaded { kind: FetchKind, added: usize },
    /// The source has no older history.
    Exhausted,
    /// The fetch failed; the error is exposed through [`Pager::error`].
    Failed(ViewError),
    /// Stale or cancelled; nothing changed.
    Discarded,
}

/// Result of delivering a locally created message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    /// Placed at index 0 of the window.
    Prepended,
    /// Held until the initial page lands.
    Buffered,
    /// Already present.
    Duplicate,
    /// Belongs to another chat.
    Ignored,
}

#[derive(Debug)]
pub struct Pager {
    chat_id: ChatId,
    page_size: u32,
    state: ViewState,
    window: MessageWindow,
    in_flight: Option<FetchTicket>,
    epoch: u64,
    next_seq: u64,
    error: Option<ViewError>,
    initial_loaded: bool,
    exhausted: bool,
    /// Created before the initial page landed, in arrival order.
    pending_created: Vec<Message>,
}

impl Pager {
    pub fn new(chat_id: ChatId, page_size: u32) -> Self {
        Self {
            chat_id,
            page_size: page_size.max(1),
            state: ViewState::Idle,
            window: MessageWindow::new(),
            in_flight: None,
            epoch: 0,
            next_seq: 0,
            error: None,
            initial_loaded: false,
            exhausted: false,
            pending_created: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    /// `Idle -> FetchingInitial`.  No-op in any other state.
    pub fn start(&mut self) -> Option<FetchRequest> {
        if self.state != ViewState::Idle {
            return None;
        }
        Some(self.issue(FetchKind::Initial))
    }

    /// The scroll position reached the oldest rendered message.
    ///
    /// Issues a backward fetch from `Ready`, or retries a failed one from
    /// `Error`.  Never issues while another fetch is outstanding or once the
    /// history is exhausted.
    pub fn reached_old_end(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() {
            tracing::trace!(chat = %self.chat_id, "fetch already in flight");
            return None;
        }
        match self.state {
            ViewState::Ready if !self.exhausted => Some(self.issue(FetchKind::Older)),
            ViewState::Error if self.initial_loaded => Some(self.issue(FetchKind::Older)),
            _ => None,
        }
    }

    /// Re-run whichever fetch failed.  No-op unless in `Error`.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.state != ViewState::Error || self.in_flight.is_some() {
            return None;
        }
        let kind = if self.initial_loaded {
            FetchKind::Older
        } else {
            FetchKind::Initial
        };
        Some(self.issue(kind))
    }

    /// Clear a surfaced error without retrying.
    pub fn dismiss_error(&mut self) {
        if self.state != ViewState::Error {
            return;
        }
        self.error = None;
        self.state = if self.initial_loaded {
            ViewState::Ready
        } else {
            ViewState::Idle
        };
    }

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        let ticket = FetchTicket {
            epoch: self.epoch,
            seq: self.next_seq,
            kind,
        };
        self.next_seq += 1;
        self.in_flight = Some(ticket);
        self.state = match kind {
            FetchKind::Initial => ViewState::FetchingInitial,
            FetchKind::Older => ViewState::FetchingMore,
        };

        let before = match kind {
            FetchKind::Initial => None,
            FetchKind::Older => self.cursor(),
        };

        tracing::debug!(
            chat = %self.chat_id,
            kind = ?kind,
            before = ?before,
            limit = self.page_size,
            "issuing history fetch"
        );

        FetchRequest {
            ticket,
            chat_id: self.chat_id,
            before,
            limit: self.page_size,
        }
    }

    // ------------------------------------------------------------------
    // Outcomes
    // ------------------------------------------------------------------

    /// Apply the outcome of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Message>, FetchError>,
    ) -> Applied {
        if self.in_flight != Some(ticket) {
            tracing::debug!(chat = %self.chat_id, "discarding stale fetch result");
            return Applied::Discarded;
        }
        self.in_flight = None;

        let page = match outcome {
            Ok(page) => page,
            Err(FetchError::Cancelled) => {
                self.state = self.resting_state();
                return Applied::Discarded;
            }
            Err(e) => {
                tracing::warn!(chat = %self.chat_id, kind = ?ticket.kind, error = %e, "history fetch failed");
                let view_error = ViewError::from(&e);
                self.error = Some(view_error.clone());
                self.state = ViewState::Error;
                return Applied::Failed(view_error);
            }
        };

        self.error = None;
        self.state = ViewState::Ready;

        match ticket.kind {
            FetchKind::Initial => {
                let received = page.len();
                let mut added = self.window.append_older(page);
                self.initial_loaded = true;
                self.exhausted = received == 0;
                for message in std::mem::take(&mut self.pending_created) {
                    if self.window.prepend(message) {
                        added += 1;
                    }
                }
                Applied::Loaded {
                    kind: FetchKind::Initial,
                    added,
                }
            }
            FetchKind::Older if page.is_empty() => {
                tracing::debug!(chat = %self.chat_id, "history exhausted");
                self.exhausted = true;
                Applied::Exhausted
            }
            FetchKind::Older => {
                let added = self.window.append_older(page);
                Applied::Loaded {
                    kind: FetchKind::Older,
                    added,
                }
            }
        }
    }

    /// Deliver a locally created message.  Never issues a fetch.
    pub fn message_created(&mut self, message: Message) -> Created {
        if message.chat_id != self.chat_id {
            tracing::warn!(
                chat = %self.chat_id,
                message_chat = %message.chat_id,
                "ignoring message for another chat"
            );
            return Created::Ignored;
        }

        if !self.initial_loaded {
            if self.pending_created.iter().any(|m| m.id == message.id) {
                return Created::Duplicate;
            }
            self.pending_created.push(message);
            return Created::Buffered;
        }

        if self.window.prepend(message) {
            Created::Prepended
        } else {
            Created::Duplicate
        }
    }

    /// Mark a message deleted wherever it is held.
    pub fn message_deleted(&mut self, id: MessageId) -> bool {
        if let Some(pending) = self.pending_created.iter_mut().find(|m| m.id == id) {
            pending.deleted = true;
            pending.content.clear();
            return true;
        }
        self.window.mark_deleted(id)
    }

    /// Forget the outstanding request.  Its eventual outcome is discarded.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        if self.in_flight.take().is_some() {
            tracing::debug!(chat = %self.chat_id, "cancelled in-flight fetch");
            self.state = self.resting_state();
        }
    }

    fn resting_state(&self) -> ViewState {
        if self.initial_loaded {
            ViewState::Ready
        } else {
            ViewState::Idle
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn window(&self) -> &MessageWindow {
        &self.window
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Id of the oldest held message.
    pub fn cursor(&self) -> Option<MessageId> {
        self.window.oldest().map(|m| m.id)
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }
}
