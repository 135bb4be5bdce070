//! Per-account candidate search.

use tracing::{debug, warn};

use crate::core::filter::{FilterRules, Verdict, evaluate};
use crate::core::types::{AccountId, Post};
use crate::io::platform::{Platform, PlatformError};
use crate::state::RunState;

/// Result of probing one account.
#[derive(Debug)]
pub enum SearchOutcome {
    /// First post (newest first) that passed every filter check.
    Found(Post),
    /// The fetched window held no candidate.
    NotFound { scanned: usize },
    /// The timeline could not be fetched.
    FetchFailed(PlatformError),
}

/// Fetch up to `max_posts` recent posts from `account` and return the first candidate.
pub fn search<P: Platform>(
    platform: &P,
    account: &AccountId,
    state: &RunState,
    rules: &FilterRules,
    max_posts: usize,
) -> SearchOutcome {
    let posts = match platform.fetch_recent(account, max_posts) {
        Ok(posts) => posts,
        Err(err) => {
            warn!(account = %account, error = %err, "timeline fetch failed");
            return SearchOutcome::FetchFailed(err);
        }
    };

    let mut scanned = 0;
    for post in posts.into_iter().take(max_posts) {
        scanned += 1;
        match evaluate(&post, state, rules) {
            Verdict::Accept => {
                debug!(account = %account, post_id = %post.id, likes = post.likes, "candidate found");
                return SearchOutcome::Found(post);
            }
            Verdict::Reject(reason) => {
                debug!(account = %account, post_id = %post.id, ?reason, "post skipped");
            }
        }
    }
    SearchOutcome::NotFound { scanned }
}
