//! Notifications delivered to one open chat view.
//!
//! Each [`ChatView`](crate::view::ChatView) owns the receiving half of its
//! own channel.  The matching [`ChatEventSender`] is handed to whatever
//! creates or deletes messages for that chat; once the view is dropped every
//! send fails with [`ClientError::ViewClosed`], so there is nothing to
//! unsubscribe.

use tokio::sync::mpsc;

use murmur_shared::{ChatId, Message, MessageId};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A message was created locally (typically just sent by this user).
    MessageCreated(Message),
    /// A message was deleted.
    MessageDeleted(MessageId),
}

/// Sending half of a view's event channel.
#[derive(Debug, Clone)]
pub struct ChatEventSender {
    chat_id: ChatId,
    tx: mpsc::UnboundedSender<ChatEvent>,
}

pub(crate) fn channel(chat_id: ChatId) -> (ChatEventSender, mpsc::UnboundedReceiver<ChatEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChatEventSender { chat_id, tx }, rx)
}

impl ChatEventSender {
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn message_created(&self, message: Message) -> Result<(), ClientError> {
        self.send(ChatEvent::MessageCreated(message))
    }

    pub fn message_deleted(&self, id: MessageId) -> Result<(), ClientError> {
        self.send(ChatEvent::MessageDeleted(id))
    }

    pub fn send(&self, event: ChatEvent) -> Result<(), ClientError> {
        self.tx.send(event).map_err(|_| ClientError::ViewClosed)
    }

    /// Whether the view behind this sender has been torn down.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
