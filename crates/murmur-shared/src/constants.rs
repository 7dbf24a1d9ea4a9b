/// Application name
pub const APP_NAME: &str = "Murmur";

/// Number of messages requested per history page
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Upper bound accepted for a single page request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Seconds before a stalled history fetch is abandoned
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Distance in pixels from the oldest rendered message that counts as "reached"
pub const DEFAULT_SCROLL_THRESHOLD_PX: f32 = 48.0;

/// Participant names combined into a derived chat title
pub const DEFAULT_NAMES_TO_COMBINE: usize = 3;

/// Maximum number of avatars shown in a chat head
pub const MAX_CHAT_HEAD_IMAGES: usize = 3;

/// Placeholder avatar used when a user has no profile image
pub const DEFAULT_PROFILE_IMAGE_ID: &str = "default-profile";
pub const DEFAULT_PROFILE_IMAGE_URL: &str = "/images/default-profile.png";

/// Title used when a chat has neither a name nor other participants
pub const FALLBACK_CHAT_TITLE: &str = "Chat";
