//! Scheduled quote-reposting bot.
//!
//! Each invocation samples a few source accounts, looks for a recent post with
//! video that passes the content filters, quotes it, and records what happened
//! so later runs never repeat a post and stop probing accounts that keep
//! coming up empty.
//!
//! - **[`core`]**: Pure logic (filtering, exhaustion bookkeeping, sampling).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and state files, the X API).
//!
//! Orchestration modules ([`search`], [`run`], [`status`]) combine the two to
//! implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
pub mod search;
pub mod state;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
