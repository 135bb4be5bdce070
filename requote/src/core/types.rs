//! Shared deterministic types for the selection core.
//!
//! These types are produced by the platform adapters and consumed by the
//! filter, search and scheduler. They carry no I/O handles.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized account handle (leading `@` and surrounding whitespace stripped).
///
/// Every constructor normalizes, so two ids compare equal iff they name the
/// same account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: &str) -> Self {
        Self(normalize_handle(raw).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize_handle(raw: &str) -> &str {
    raw.trim().trim_start_matches('@').trim()
}

impl From<String> for AccountId {
    fn from(raw: String) -> Self {
        let normalized = normalize_handle(&raw);
        if normalized.len() == raw.len() {
            return Self(raw);
        }
        Self(normalized.to_string())
    }
}

impl From<&str> for AccountId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of an attached media item, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    AnimatedGif,
    Other,
}

impl MediaKind {
    /// Map a platform media `type` string onto a kind.
    pub fn from_platform(kind: &str) -> Self {
        match kind {
            "photo" => MediaKind::Photo,
            "video" => MediaKind::Video,
            "animated_gif" => MediaKind::AnimatedGif,
            _ => MediaKind::Other,
        }
    }

    /// Moving media (video or animated GIF).
    pub fn is_motion(self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::AnimatedGif)
    }
}

/// A fetched post, with full (untruncated) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub likes: u64,
    pub media: Vec<MediaKind>,
    pub author: AccountId,
}

impl Post {
    /// Public URL used when quoting this post.
    pub fn url(&self) -> String {
        format!("https://x.com/{}/status/{}", self.author, self.id)
    }

    pub fn has_motion_media(&self) -> bool {
        self.media.iter().any(|kind| kind.is_motion())
    }
}
