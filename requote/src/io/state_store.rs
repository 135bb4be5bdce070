//! Run state storage (`.requote/state.json`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::state::RunState;

/// Load run state from disk. A missing file is an empty state.
pub fn load_state(path: &Path) -> Result<RunState> {
    if !path.exists() {
        debug!(path = %path.display(), "no state file, starting empty");
        return Ok(RunState::default());
    }
    debug!(path = %path.display(), "loading run state");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read run state {}", path.display()))?;
    let state: RunState = serde_json::from_str(&contents)
        .with_context(|| format!("parse run state {}", path.display()))?;
    debug!(
        posted = state.posted_ids.len(),
        exhausted = state.exhausted_accounts.len(),
        "run state loaded"
    );
    Ok(state)
}

/// Atomically write run state to disk (temp file + rename).
pub fn write_state(path: &Path, state: &RunState) -> Result<()> {
    debug!(
        path = %path.display(),
        posted = state.posted_ids.len(),
        exhausted = state.exhausted_accounts.len(),
        "writing run state"
    );
    let mut buf = serde_json::to_string_pretty(state).context("serialize run state")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
