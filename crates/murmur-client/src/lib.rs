//! Murmur client core: participant identities, chat titles, chat heads and
//! paginated message history for one open chat.

pub mod chat_head;
pub mod chat_name;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod pagination;
pub mod participants;
pub mod source;
pub mod state;
pub mod summary;
pub mod view;
pub mod window;

pub use chat_head::{compose_chat_head, ChatHead, ChatHeadLayout, Slot};
pub use chat_name::{combine_names, resolve_chat_name, ChatNameOptions};
pub use config::ClientConfig;
pub use error::{ClientError, FetchError, ViewError};
pub use events::{ChatEvent, ChatEventSender};
pub use feed::{render_feed, FeedEntry};
pub use pagination::{Pager, ViewState};
pub use participants::{resolve_participants, ChatOverview, Participant, ParticipantMap};
pub use source::{ChatDirectory, HttpSource, MessageSource, StoreSource};
pub use state::AppState;
pub use summary::ChatSummary;
pub use view::{ChatView, ScrollMetrics, ViewUpdate};
pub use window::MessageWindow;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the default filter.  Calling this again after a
/// subscriber is installed does nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("murmur_client=debug,murmur_store=info,warn"));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Starting {}", murmur_shared::constants::APP_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
