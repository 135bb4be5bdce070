//! Candidate filter applied to a single fetched post.
//!
//! Checks run in a fixed order and stop at the first failure: dedup, media
//! type, forbidden keywords, engagement. A post is a candidate only when all
//! four hold.

use crate::core::types::Post;
use crate::state::RunState;

/// Thresholds and word lists the filter checks against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules {
    pub min_likes: u64,
    pub forbidden_keywords: Vec<String>,
}

/// Why a post was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    AlreadyPosted,
    NoMotionMedia,
    ForbiddenKeyword(String),
    BelowEngagement { likes: u64, min_likes: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

pub fn evaluate(post: &Post, state: &RunState, rules: &FilterRules) -> Verdict {
    if state.has_posted(&post.id) {
        return Verdict::Reject(Rejection::AlreadyPosted);
    }
    if !post.has_motion_media() {
        return Verdict::Reject(Rejection::NoMotionMedia);
    }
    if let Some(keyword) = find_forbidden_keyword(&post.text, &rules.forbidden_keywords) {
        return Verdict::Reject(Rejection::ForbiddenKeyword(keyword.to_string()));
    }
    if post.likes < rules.min_likes {
        return Verdict::Reject(Rejection::BelowEngagement {
            likes: post.likes,
            min_likes: rules.min_likes,
        });
    }
    Verdict::Accept
}

/// First keyword found in `text`, matched as a raw substring or lower-cased.
pub fn find_forbidden_keyword<'a>(text: &str, keywords: &'a [String]) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .find(|keyword| text.contains(keyword.as_str()) || lowered.contains(&keyword.to_lowercase()))
        .map(String::as_str)
}
