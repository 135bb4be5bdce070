//! Platform abstraction for reading timelines and publishing quotes.
//!
//! The [`Platform`] trait decouples the scheduler from the X API. Tests use
//! scripted platforms that replay canned timelines without network access.

use thiserror::Error;

use crate::core::types::{AccountId, Post};

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("invalid quote target: {0}")]
    InvalidQuoteTarget(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        PlatformError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        PlatformError::Parse(err.to_string())
    }
}

/// Read/publish capability against a social platform.
pub trait Platform {
    /// Up to `max_count` of the account's most recent posts, newest first, with full text.
    fn fetch_recent(&self, account: &AccountId, max_count: usize) -> PlatformResult<Vec<Post>>;

    /// Publish `caption` quoting the post at `quoted_url`. Returns the new post id.
    fn publish_quote(&self, caption: &str, quoted_url: &str) -> PlatformResult<String>;
}

impl<P: Platform + ?Sized> Platform for &P {
    fn fetch_recent(&self, account: &AccountId, max_count: usize) -> PlatformResult<Vec<Post>> {
        (**self).fetch_recent(account, max_count)
    }

    fn publish_quote(&self, caption: &str, quoted_url: &str) -> PlatformResult<String> {
        (**self).publish_quote(caption, quoted_url)
    }
}
