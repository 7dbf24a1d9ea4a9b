//! Chat title derivation.
//!
//! An explicit chat name always wins.  Otherwise the title is built from the
//! resolved names of the other participants, e.g. `"Alice & Bob"` or
//! `"Alice, Bob & Carol & 2 others"`.

use murmur_shared::constants::{DEFAULT_NAMES_TO_COMBINE, FALLBACK_CHAT_TITLE};
use murmur_shared::UserId;

use crate::participants::ChatOverview;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatNameOptions {
    /// How many participant names to spell out before folding the rest.
    pub number_to_combine: usize,
    /// Leave the viewing user out of the title.
    pub ignore_active_user: bool,
}

impl Default for ChatNameOptions {
    fn default() -> Self {
        Self {
            number_to_combine: DEFAULT_NAMES_TO_COMBINE,
            ignore_active_user: true,
        }
    }
}

/// Resolve the title shown for `chat` to `active_user`.
pub fn resolve_chat_name(
    chat: &ChatOverview,
    active_user: UserId,
    options: ChatNameOptions,
) -> String {
    if let Some(name) = chat.explicit_name.as_deref() {
        if !name.trim().is_empty() {
            return name.to_string();
        }
    }

    let eligible: Vec<&str> = chat
        .participants
        .iter()
        .filter(|p| !(options.ignore_active_user && p.user_id == active_user))
        .map(|p| p.resolved_name())
        .collect();

    combine_names(&eligible, options.number_to_combine)
}

/// Join up to `limit` names with `", "`, the last pair with `" & "`, then
/// append `" & N other(s)"` for the names left out.
pub fn combine_names(names: &[&str], limit: usize) -> String {
    if names.is_empty() {
        return FALLBACK_CHAT_TITLE.to_string();
    }
    if limit == 0 {
        return plural(names.len(), "participant", "participants");
    }

    let shown = &names[..limit.min(names.len())];
    let remaining = names.len() - shown.len();

    let mut title = match shown.split_last() {
        Some((last, [])) => last.to_string(),
        Some((last, head)) => format!("{} & {}", head.join(", "), last),
        None => return FALLBACK_CHAT_TITLE.to_string(),
    };
    if remaining > 0 {
        title.push_str(" & ");
        title.push_str(&plural(remaining, "other", "others"));
    }
    title
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::tests::raw;
    use crate::participants::ChatOverview;
    use murmur_shared::{ChatId, RawChat};

    fn chat_of(tags: &[&str], name: Option<&str>) -> ChatOverview {
        let raw_chat = RawChat {
            id: ChatId::new(),
            name: name.map(str::to_string),
            image: None,
            participants: tags.iter().map(|t| raw("", "", t)).collect(),
            recent_message: None,
        };
        ChatOverview::from_raw(&raw_chat).unwrap()
    }

    #[test]
    fn test_explicit_name_wins_verbatim() {
        let chat = chat_of(&["alice", "bob"], Some("  Weekend plans "));
        let title = resolve_chat_name(&chat, UserId::new(), ChatNameOptions::default());
        assert_eq!(title, "  Weekend plans ");
    }

    #[test]
    fn test_blank_explicit_name_is_ignored() {
        let chat = chat_of(&["alice", "bob"], Some("   "));
        let title = resolve_chat_name(&chat, UserId::new(), ChatNameOptions::default());
        assert_eq!(title, "alice & bob");
    }

    #[test]
    fn test_single_and_pair() {
        assert_eq!(combine_names(&["Alice"], 3), "Alice");
        assert_eq!(combine_names(&["Alice", "Bob"], 3), "Alice & Bob");
        assert_eq!(combine_names(&["Alice", "Bob", "Carol"], 3), "Alice, Bob & Carol");
    }

    #[test]
    fn test_overflow_folds_into_others() {
        assert_eq!(
            combine_names(&["Alice", "Bob", "Carol", "Dave"], 3),
            "Alice, Bob & Carol & 1 other"
        );
        assert_eq!(
            combine_names(&["Alice", "Bob", "Carol", "Dave", "Erin"], 3),
            "Alice, Bob & Carol & 2 others"
        );
        assert_eq!(
            combine_names(&["Alice", "Bob", "Carol", "Dave"], 2),
            "Alice & Bob & 2 others"
        );
        assert_eq!(combine_names(&["Alice", "Bob", "Carol"], 1), "Alice & 2 others");
    }

    #[test]
    fn test_zero_limit_counts_participants() {
        assert_eq!(combine_names(&["Alice"], 0), "1 participant");
        assert_eq!(combine_names(&["Alice", "Bob"], 0), "2 participants");
    }

    #[test]
    fn test_no_names_falls_back() {
        assert_eq!(combine_names(&[], 3), "Chat");
        assert_eq!(combine_names(&[], 0), "Chat");
    }

    #[test]
    fn test_active_user_is_skipped() {
        let chat = chat_of(&["me", "alice", "bob"], None);
        let me = chat.participants[0].user_id;

        let title = resolve_chat_name(&chat, me, ChatNameOptions::default());
        assert_eq!(title, "alice & bob");

        let with_me = ChatNameOptions {
            ignore_active_user: false,
            ..ChatNameOptions::default()
        };
        assert_eq!(resolve_chat_name(&chat, me, with_me), "me, alice & bob");
    }

    #[test]
    fn test_chat_with_only_active_user() {
        let chat = chat_of(&["me"], None);
        let me = chat.participants[0].user_id;
        assert_eq!(
            resolve_chat_name(&chat, me, ChatNameOptions::default()),
            "Chat"
        );
    }

    #[test]
    fn test_name_count_matches_limit() {
        let tags = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"];
        for n in 1..=tags.len() {
            let chat = chat_of(&tags[..n], None);
            let title = resolve_chat_name(&chat, UserId::new(), ChatNameOptions::default());
            let spelled = tags[..n].iter().filter(|t| title.contains(*t)).count();
            assert_eq!(spelled, n.min(3), "title {title:?}");
            assert_eq!(title.contains("other"), n > 3, "title {title:?}");
        }
    }
}
