//! Everything a chat list row needs, built from one raw chat record.

use murmur_shared::{Message, RawChat, UserId};

use crate::chat_head::{compose_chat_head, ChatHead};
use crate::chat_name::{resolve_chat_name, ChatNameOptions};
use crate::error::ClientError;
use crate::participants::{ChatOverview, ParticipantMap};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSummary {
    pub title: String,
    pub participants: ParticipantMap,
    pub head: ChatHead,
    pub overview: ChatOverview,
}

impl ChatSummary {
    pub fn build(
        raw: &RawChat,
        active_user: UserId,
        options: ChatNameOptions,
    ) -> Result<Self, ClientError> {
        let overview = ChatOverview::from_raw(raw)?;
        let participants = ParticipantMap::from_overview(&overview);
        let title = resolve_chat_name(&overview, active_user, options);
        let head = compose_chat_head(&overview, &participants, active_user);

        tracing::debug!(
            chat = %overview.chat_id,
            title = %title,
            images = head.images.len(),
            "built chat summary"
        );

        Ok(Self {
            title,
            participants,
            head,
            overview,
        })
    }

    pub fn recent_message(&self) -> Option<&Message> {
        self.overview.recent_message.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_head::ChatHeadLayout;
    use crate::participants::tests::raw;
    use murmur_shared::ChatId;

    fn raw_chat(participants: Vec<murmur_shared::RawParticipant>) -> RawChat {
        RawChat {
            id: ChatId::new(),
            name: None,
            image: None,
            participants,
            recent_message: None,
        }
    }

    #[test]
    fn test_build_group_summary() {
        let me = raw("", "", "me");
        let chat = raw_chat(vec![
            me.clone(),
            raw("", "Alice", "alice"),
            raw("", "Bob", "bob"),
        ]);

        let summary = ChatSummary::build(&chat, me.user.id, ChatNameOptions::default()).unwrap();
        assert_eq!(summary.title, "Alice & Bob");
        assert_eq!(summary.participants.len(), 3);
        assert_eq!(summary.head.layout, ChatHeadLayout::TwoHalves);
        assert_eq!(summary.head.images[0].alt, "Alice");
        assert!(summary.recent_message().is_none());
    }

    #[test]
    fn test_explicit_name_wins() {
        let me = raw("", "", "me");
        let mut chat = raw_chat(vec![me.clone(), raw("", "Alice", "alice")]);
        chat.name = Some("Book club".into());

        let summary = ChatSummary::build(&chat, me.user.id, ChatNameOptions::default()).unwrap();
        assert_eq!(summary.title, "Book club");
    }

    #[test]
    fn test_malformed_participant_fails() {
        let me = raw("", "", "me");
        let chat = raw_chat(vec![me.clone(), raw("", "Ghost", "  ")]);
        let err = ChatSummary::build(&chat, me.user.id, ChatNameOptions::default()).unwrap_err();
        assert!(matches!(err, ClientError::MalformedParticipant { .. }));
    }
}
