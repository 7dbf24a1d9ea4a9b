//! Chat head composition: which images represent a chat, and how they are
//! laid out in the avatar square.

use serde::Serialize;

use murmur_shared::constants::MAX_CHAT_HEAD_IMAGES;
use murmur_shared::{ImageRef, UserId};

use crate::participants::{ChatOverview, ParticipantMap};

/// Layout variant, chosen purely by the number of images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatHeadLayout {
    /// One image filling the whole area.
    Single,
    /// Two equal vertical halves.
    TwoHalves,
    /// Full-height left half, two stacked quarters on the right.
    LeftFullRightStacked,
}

/// A slot rectangle in unit coordinates (`0.0..=1.0` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

const fn slot(x: f32, y: f32, width: f32, height: f32) -> Slot {
    Slot {
        x,
        y,
        width,
        height,
    }
}

const SINGLE_SLOTS: [Slot; 1] = [slot(0.0, 0.0, 1.0, 1.0)];
const TWO_HALVES_SLOTS: [Slot; 2] = [slot(0.0, 0.0, 0.5, 1.0), slot(0.5, 0.0, 0.5, 1.0)];
const LEFT_FULL_RIGHT_STACKED_SLOTS: [Slot; 3] = [
    slot(0.0, 0.0, 0.5, 1.0),
    slot(0.5, 0.0, 0.5, 0.5),
    slot(0.5, 0.5, 0.5, 0.5),
];

impl ChatHeadLayout {
    /// Layout for `count` images.  Zero is treated like one, since a composed
    /// chat head always holds at least the placeholder.
    pub fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Single,
            2 => Self::TwoHalves,
            _ => Self::LeftFullRightStacked,
        }
    }

    /// Slot rectangles, one per image, in image order.
    pub fn slots(self) -> &'static [Slot] {
        match self {
            Self::Single => &SINGLE_SLOTS,
            Self::TwoHalves => &TWO_HALVES_SLOTS,
            Self::LeftFullRightStacked => &LEFT_FULL_RIGHT_STACKED_SLOTS,
        }
    }
}

/// The images representing a chat plus their layout.  Holds 1 to 3 images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatHead {
    pub images: Vec<ImageRef>,
    pub layout: ChatHeadLayout,
}

impl ChatHead {
    /// Pair each image with its slot.
    pub fn placed(&self) -> impl Iterator<Item = (&ImageRef, Slot)> {
        self.images.iter().zip(self.layout.slots().iter().copied())
    }
}

/// Compose the chat head for `chat` as seen by `active_user`.
///
/// An explicit chat image wins.  Otherwise up to three other participants
/// contribute their avatar (or the placeholder) in participant order; a chat
/// with nobody else gets a single placeholder.
pub fn compose_chat_head(
    chat: &ChatOverview,
    participants: &ParticipantMap,
    active_user: UserId,
) -> ChatHead {
    let mut images = Vec::with_capacity(MAX_CHAT_HEAD_IMAGES);

    if let Some(image) = &chat.explicit_image {
        images.push(image.clone());
    } else {
        for participant in chat
            .participants
            .iter()
            .filter(|p| p.user_id != active_user)
            .take(MAX_CHAT_HEAD_IMAGES)
        {
            let alt = participants
                .name_of(participant.user_id)
                .unwrap_or_else(|| participant.resolved_name())
                .to_string();
            let image = match &participant.profile_image {
                Some(image) => ImageRef {
                    alt,
                    ..image.clone()
                },
                None => ImageRef::placeholder(alt),
            };
            images.push(image);
        }
    }

    if images.is_empty() {
        images.push(ImageRef::placeholder(""));
    }

    let layout = ChatHeadLayout::for_count(images.len());
    ChatHead { images, layout }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::tests::raw;
    use murmur_shared::{ChatId, RawChat, RawParticipant};

    fn avatar(id: &str) -> ImageRef {
        ImageRef {
            id: id.to_string(),
            url: format!("/images/{id}.png"),
            alt: String::new(),
        }
    }

    fn with_avatar(mut p: RawParticipant, id: &str) -> RawParticipant {
        p.user.preferences.profile_image = Some(avatar(id));
        p
    }

    fn overview(participants: Vec<RawParticipant>, image: Option<ImageRef>) -> ChatOverview {
        ChatOverview::from_raw(&RawChat {
            id: ChatId::new(),
            name: None,
            image,
            participants,
            recent_message: None,
        })
        .unwrap()
    }

    fn head(chat: &ChatOverview, me: UserId) -> ChatHead {
        compose_chat_head(chat, &ParticipantMap::from_overview(chat), me)
    }

    #[test]
    fn test_explicit_image_is_single() {
        let chat = overview(
            vec![with_avatar(raw("", "", "alice"), "a")],
            Some(avatar("group")),
        );
        let h = head(&chat, UserId::new());
        assert_eq!(h.layout, ChatHeadLayout::Single);
        assert_eq!(h.images, vec![avatar("group")]);
    }

    #[test]
    fn test_two_avatars_split_in_halves() {
        let me = raw("", "", "me");
        let me_id = me.user.id;
        let chat = overview(
            vec![
                with_avatar(me, "mine"),
                with_avatar(raw("", "Alice", "alice"), "a"),
                with_avatar(raw("", "", "bob"), "b"),
            ],
            None,
        );
        let h = head(&chat, me_id);
        assert_eq!(h.layout, ChatHeadLayout::TwoHalves);
        let ids: Vec<_> = h.images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(h.images[0].alt, "Alice");
    }

    #[test]
    fn test_at_most_three_with_placeholders() {
        let chat = overview(
            vec![
                raw("", "", "alice"),
                with_avatar(raw("", "", "bob"), "b"),
                raw("", "", "carol"),
                with_avatar(raw("", "", "dave"), "d"),
            ],
            None,
        );
        let h = head(&chat, UserId::new());
        assert_eq!(h.layout, ChatHeadLayout::LeftFullRightStacked);
        assert_eq!(h.images.len(), 3);
        assert!(h.images[0].is_placeholder());
        assert_eq!(h.images[1].id, "b");
        assert!(h.images[2].is_placeholder());
        assert_eq!(h.images[2].alt, "carol");
    }

    #[test]
    fn test_nobody_else_gives_one_placeholder() {
        let me = raw("", "", "me");
        let me_id = me.user.id;
        let chat = overview(vec![with_avatar(me, "mine")], None);
        let h = head(&chat, me_id);
        assert_eq!(h.images.len(), 1);
        assert!(h.images[0].is_placeholder());
        assert_eq!(h.layout, ChatHeadLayout::Single);
    }

    #[test]
    fn test_slots_match_image_count() {
        for count in 1..=3 {
            let layout = ChatHeadLayout::for_count(count);
            assert_eq!(layout.slots().len(), count);
            let area: f32 = layout.slots().iter().map(|s| s.width * s.height).sum();
            assert!((area - 1.0).abs() < f32::EPSILON);
        }
        assert_eq!(ChatHeadLayout::for_count(0), ChatHeadLayout::Single);
    }

    #[test]
    fn test_placed_pairs_images_with_slots() {
        let chat = overview(
            vec![
                with_avatar(raw("", "", "alice"), "a"),
                with_avatar(raw("", "", "bob"), "b"),
                with_avatar(raw("", "", "carol"), "c"),
            ],
            None,
        );
        let h = head(&chat, UserId::new());
        let placed: Vec<_> = h.placed().collect();
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[0].1, slot(0.0, 0.0, 0.5, 1.0));
        assert_eq!(placed[2].1, slot(0.5, 0.5, 0.5, 0.5));
    }
}
