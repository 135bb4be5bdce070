//! Initialization helpers for `.requote/` scaffolding.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use super::config::{BotConfig, write_config};
use super::state_store::write_state;
use crate::state::RunState;

/// Canonical paths within `.requote/` for a project root.
#[derive(Debug, Clone)]
pub struct BotPaths {
    pub root: PathBuf,
    pub bot_dir: PathBuf,
    pub config_path: PathBuf,
    pub state_path: PathBuf,
}

impl BotPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let bot_dir = root.join(".requote");
        Self {
            root,
            config_path: bot_dir.join("config.toml"),
            state_path: bot_dir.join("state.json"),
            bot_dir,
        }
    }
}

/// Options for `init_bot`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite the existing config and state.
    pub force: bool,
}

/// Create `.requote/` with a default config and an empty state document.
///
/// Fails if `.requote/` already exists unless `options.force` is set.
pub fn init_bot(root: &Path, options: &InitOptions) -> Result<BotPaths> {
    let paths = BotPaths::new(root);
    if paths.bot_dir.exists() && !paths.bot_dir.is_dir() {
        return Err(anyhow!("requote init: .requote exists but is not a directory"));
    }
    if paths.bot_dir.exists() && !options.force {
        return Err(anyhow!(
            "requote init: .requote already exists (use --force to overwrite)"
        ));
    }

    write_config(&paths.config_path, &BotConfig::default())?;
    write_state(&paths.state_path, &RunState::default())?;
    Ok(paths)
}
