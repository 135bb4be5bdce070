//! Stable exit codes for requote CLI commands.

/// Command succeeded; for `requote run`, the run went through its sampled accounts.
pub const OK: i32 = 0;
/// Command failed due to invalid config/state or other errors.
pub const INVALID: i32 = 1;
/// `requote run` found the bot disabled (`enabled = false`).
pub const DISABLED: i32 = 2;
/// `requote run` found no eligible account (all exhausted or none configured).
pub const NO_ELIGIBLE: i32 = 3;
