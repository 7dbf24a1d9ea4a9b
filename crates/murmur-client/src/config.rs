//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the core works with zero
//! configuration against a local store.

use std::time::Duration;

use murmur_shared::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_NAMES_TO_COMBINE, DEFAULT_PAGE_SIZE,
    DEFAULT_SCROLL_THRESHOLD_PX, MAX_PAGE_SIZE,
};

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the HTTP API, e.g. `https://murmur.example/api`.
    /// Env: `MURMUR_API_URL`
    /// Default: none (local store only).
    pub api_url: Option<String>,

    /// Messages requested per history page.
    /// Env: `MURMUR_PAGE_SIZE` (1..=100)
    /// Default: `30`
    pub page_size: u32,

    /// How long a history fetch may stall before it fails.
    /// Env: `MURMUR_FETCH_TIMEOUT_SECS`
    /// Default: `15`
    pub fetch_timeout: Duration,

    /// Distance from the oldest rendered message that triggers a backward fetch.
    /// Env: `MURMUR_SCROLL_THRESHOLD_PX`
    /// Default: `48.0`
    pub scroll_threshold_px: f32,

    /// Participant names combined into a derived chat title.
    /// Env: `MURMUR_NAME_COMBINE`
    /// Default: `3`
    pub names_to_combine: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            names_to_combine: DEFAULT_NAMES_TO_COMBINE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("MURMUR_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.api_url = Some(url.to_string());
            }
        }

        if let Some(val) = lookup("MURMUR_PAGE_SIZE") {
            match val.parse::<u32>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => config.page_size = n,
                _ => tracing::warn!(value = %val, "Invalid MURMUR_PAGE_SIZE, using default"),
            }
        }

        if let Some(val) = lookup("MURMUR_FETCH_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.fetch_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %val,
                    "Invalid MURMUR_FETCH_TIMEOUT_SECS, using default"
                ),
            }
        }

        if let Some(val) = lookup("MURMUR_SCROLL_THRESHOLD_PX") {
            match val.parse::<f32>() {
                Ok(px) if px.is_finite() && px >= 0.0 => config.scroll_threshold_px = px,
                _ => tracing::warn!(
                    value = %val,
                    "Invalid MURMUR_SCROLL_THRESHOLD_PX, using default"
                ),
            }
        }

        if let Some(val) = lookup("MURMUR_NAME_COMBINE") {
            match val.parse::<usize>() {
                Ok(n) => config.names_to_combine = n,
                Err(_) => tracing::warn!(value = %val, "Invalid MURMUR_NAME_COMBINE, using default"),
            }
        }

        config
    }
}
