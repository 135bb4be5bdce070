//! Investigation tests against the live X API.
//!
//! These tests read real timelines and are excluded from regular runs
//! because they need network access and OAuth 1.0a user credentials.
//!
//! # Prerequisites
//!
//! - `X_API_KEY`, `X_API_KEY_SECRET`, `X_ACCESS_TOKEN`, `X_ACCESS_TOKEN_SECRET` set
//! - Optionally `REQUOTE_PROBE_ACCOUNT` (defaults to `XDevelopers`)
//!
//! # Running
//!
//! ```bash
//! cargo test --test investigation -- --ignored --nocapture
//! ```
//!
//! Nothing is published.

use requote::core::types::AccountId;
use requote::io::credentials::Credentials;
use requote::io::platform::Platform;
use requote::io::x_client::XClient;

fn live_client() -> XClient {
    let credentials = Credentials::from_env().expect("X_* credentials must be set");
    XClient::new(credentials).expect("build client")
}

fn probe_account() -> AccountId {
    AccountId::new(
        &std::env::var("REQUOTE_PROBE_ACCOUNT").unwrap_or_else(|_| "XDevelopers".to_string()),
    )
}

/// Verifies handle lookup resolves to a numeric user id.
#[test]
#[ignore]
fn lookup_user_resolves_numeric_id() {
    let user = live_client()
        .lookup_user(&probe_account())
        .expect("lookup user");

    assert!(user.id.bytes().all(|b| b.is_ascii_digit()), "id: {}", user.id);
    println!("resolved @{} -> {}", user.username, user.id);
}

/// Verifies a timeline fetch honours the requested count and attaches
/// media kinds and like counts.
#[test]
#[ignore]
fn fetch_recent_returns_at_most_requested_posts() {
    let posts = live_client()
        .fetch_recent(&probe_account(), 7)
        .expect("fetch timeline");

    assert!(posts.len() <= 7);
    for post in &posts {
        println!(
            "{} likes={} media={:?} motion={}",
            post.url(),
            post.likes,
            post.media,
            post.has_motion_media()
        );
    }
}
