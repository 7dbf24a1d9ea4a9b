//! The client-held slice of a chat's history.
//!
//! A [`MessageWindow`] is ordered newest first and has exactly two insertion
//! points:
//!
//! - the **head**, where locally created messages are prepended, and
//! - the **tail**, where older history pages are appended.
//!
//! The two never conflict.  A history page is bounded strictly below the
//! current tail, so nothing it contains can also be a freshly created
//! message, and a created message is never a candidate for a backward page.
//! An id index keeps every message id unique within the window.

use std::collections::{HashSet, VecDeque};

use murmur_shared::{Message, MessageId};

#[derive(Debug, Clone, Default)]
pub struct MessageWindow {
    messages: VecDeque<Message>,
    ids: HashSet<MessageId>,
}

impl MessageWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a locally created message at index 0.
    ///
    /// Returns `false` (and leaves the window untouched) if the id is already
    /// held, e.g. when the same creation event is delivered twice.
    pub fn prepend(&mut self, message: Message) -> bool {
        if !self.ids.insert(message.id) {
            return false;
        }
        self.messages.push_front(message);
        true
    }

    /// Append a newest-first page of older history to the tail.
    ///
    /// Each message must be strictly older than the current tail; anything
    /// else (a duplicate, or an out-of-order entry from a misbehaving source)
    /// is skipped so the window stays ordered and distinct.  Returns the
    /// number of messages appended.
    pub fn append_older(&mut self, page: Vec<Message>) -> usize {
        let mut appended = 0;
        for message in page {
            if self.ids.contains(&message.id) {
                tracing::warn!(message = %message.id, "skipping duplicate history message");
                continue;
            }
            if let Some(tail) = self.messages.back() {
                if !message.is_older_than(tail) {
                    tracing::warn!(
                        message = %message.id,
                        tail = %tail.id,
                        "skipping out-of-order history message"
                    );
                    continue;
                }
            }
            self.ids.insert(message.id);
            self.messages.push_back(message);
            appended += 1;
        }
        appended
    }

    /// Mark a held message deleted.  Returns `false` if it is not held.
    pub fn mark_deleted(&mut self, id: MessageId) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.deleted = true;
                message.content.clear();
                true
            }
            None => false,
        }
    }

    /// The oldest held message, i.e. the cursor for the next backward page.
    pub fn oldest(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn newest(&self) -> Option<&Message> {
        self.messages.front()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }
}
