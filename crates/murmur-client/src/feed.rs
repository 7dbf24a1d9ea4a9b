//! Display-ready rendering of a message window.

use serde::Serialize;

use murmur_shared::{Message, MessageId, UserId};

use crate::participants::ParticipantMap;
use crate::window::MessageWindow;

/// Author label for users who are no longer part of the chat.
pub const UNKNOWN_AUTHOR: &str = "Unknown user";

/// Reply label when the target message is not in the window.
pub const UNRESOLVED_REPLY: &str = "Replying to a message";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub id: MessageId,
    pub author: UserId,
    pub author_name: String,
    /// `None` for deleted messages.
    pub body: Option<String>,
    pub image_count: u32,
    pub reply_label: Option<String>,
}

/// One entry per held message, newest first.
pub fn render_feed(window: &MessageWindow, participants: &ParticipantMap) -> Vec<FeedEntry> {
    window
        .iter()
        .map(|message| render_entry(message, window, participants))
        .collect()
}

fn render_entry(message: &Message, window: &MessageWindow, participants: &ParticipantMap) -> FeedEntry {
    let reply_label = message.replying_to.map(|target| {
        match window
            .get(target)
            .and_then(|replied| participants.name_of(replied.author))
        {
            Some(name) => format!("Replying to {name}"),
            None => UNRESOLVED_REPLY.to_string(),
        }
    });

    FeedEntry {
        id: message.id,
        author: message.author,
        author_name: author_label(participants, message.author).to_string(),
        body: (!message.deleted).then(|| message.content.clone()),
        image_count: message.image_count,
        reply_label,
    }
}

fn author_label(participants: &ParticipantMap, user_id: UserId) -> &str {
    participants.name_of(user_id).unwrap_or(UNKNOWN_AUTHOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::resolve_participants;
    use crate::participants::tests::raw;
    use crate::window::tests::message_at;
    use murmur_shared::ChatId;

    #[test]
    fn test_render_feed_labels() {
        let chat = ChatId::new();
        let alice = raw("", "Alice", "alice");
        let bob = raw("Bobby", "Bob", "bob");
        let participants = resolve_participants(&[alice.clone(), bob.clone()]).unwrap();

        let mut original = message_at(chat, 1);
        original.author = alice.user.id;

        let mut reply = message_at(chat, 2);
        reply.author = bob.user.id;
        reply.replying_to = Some(original.id);
        reply.image_count = 2;

        let mut orphan_reply = message_at(chat, 3);
        orphan_reply.replying_to = Some(MessageId::new());

        let mut window = MessageWindow::new();
        window.append_older(vec![orphan_reply.clone(), reply.clone(), original.clone()]);

        let feed = render_feed(&window, &participants);
        assert_eq!(feed.len(), 3);

        assert_eq!(feed[0].author_name, UNKNOWN_AUTHOR);
        assert_eq!(feed[0].reply_label.as_deref(), Some(UNRESOLVED_REPLY));

        assert_eq!(feed[1].author_name, "Bobby");
        assert_eq!(feed[1].reply_label.as_deref(), Some("Replying to Alice"));
        assert_eq!(feed[1].image_count, 2);

        assert_eq!(feed[2].author_name, "Alice");
        assert_eq!(feed[2].reply_label, None);
        assert_eq!(feed[2].body.as_deref(), Some("at 1"));
    }

    #[test]
    fn test_deleted_message_has_no_body() {
        let chat = ChatId::new();
        let message = message_at(chat, 1);
        let id = message.id;
        let mut window = MessageWindow::new();
        window.append_older(vec![message]);
        window.mark_deleted(id);

        let feed = render_feed(&window, &ParticipantMap::default());
        assert_eq!(feed[0].body, None);
    }
}
