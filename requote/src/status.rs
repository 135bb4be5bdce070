//! Read-only summary for `requote status`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::sampler::eligible_accounts;
use crate::core::types::AccountId;
use crate::io::config::BotConfig;
use crate::io::init::BotPaths;
use crate::io::state_store::load_state;
use crate::state::RunState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub enabled: bool,
    pub posted: usize,
    pub accounts: Vec<AccountStatus>,
    /// Exhausted accounts that are no longer configured.
    pub retired_unlisted: Vec<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatus {
    pub account: AccountId,
    pub consecutive_empty: u32,
    pub exhausted: bool,
}

impl StatusReport {
    pub fn eligible(&self) -> usize {
        self.accounts.iter().filter(|a| !a.exhausted).count()
    }

    pub fn render(&self) -> String {
        let mut buf = String::new();
        buf.push_str(&format!("enabled: {}\n", self.enabled));
        buf.push_str(&format!("posted: {}\n", self.posted));
        buf.push_str(&format!(
            "eligible: {}/{}\n",
            self.eligible(),
            self.accounts.len()
        ));
        for entry in &self.accounts {
            let marker = if entry.exhausted { " (exhausted)" } else { "" };
            buf.push_str(&format!(
                "- {} empty_runs={}{}\n",
                entry.account, entry.consecutive_empty, marker
            ));
        }
        if !self.retired_unlisted.is_empty() {
            buf.push_str("exhausted, not configured:\n");
            for account in &self.retired_unlisted {
                buf.push_str(&format!("- {account}\n"));
            }
        }
        buf
    }
}

pub fn build_report(cfg: &BotConfig, state: &RunState) -> StatusReport {
    let eligible = eligible_accounts(&cfg.accounts, state);
    let mut accounts: Vec<AccountStatus> = Vec::new();
    for account in &cfg.accounts {
        if accounts.iter().any(|entry| &entry.account == account) {
            continue;
        }
        accounts.push(AccountStatus {
            account: account.clone(),
            consecutive_empty: state.empty_runs(account),
            exhausted: !eligible.contains(account),
        });
    }
    let retired_unlisted = state
        .exhausted_accounts
        .iter()
        .filter(|account| !cfg.accounts.contains(account))
        .cloned()
        .collect();
    StatusReport {
        enabled: cfg.enabled,
        posted: state.posted_ids.len(),
        accounts,
        retired_unlisted,
    }
}

pub fn status_from_root(root: &Path, cfg: &BotConfig) -> Result<StatusReport> {
    let paths = BotPaths::new(root);
    let state = load_state(&paths.state_path).context("load state for status")?;
    Ok(build_report(cfg, &state))
}
