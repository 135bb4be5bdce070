use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::types::AccountId;

/// Cross-run bookkeeping persisted at `.requote/state.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunState {
    /// Source posts already quoted, in publish order.
    #[serde(alias = "posted_tweet_ids")]
    pub posted_ids: Vec<String>,
    /// Runs in a row that produced no candidate, per account. Missing means 0.
    pub consecutive_empty_runs: BTreeMap<AccountId, u32>,
    /// Accounts that are never probed again.
    pub exhausted_accounts: BTreeSet<AccountId>,
}

impl RunState {
    pub fn has_posted(&self, post_id: &str) -> bool {
        self.posted_ids.iter().any(|id| id == post_id)
    }

    /// Append `post_id` unless it is already present.
    pub fn mark_posted(&mut self, post_id: &str) -> bool {
        if self.has_posted(post_id) {
            return false;
        }
        self.posted_ids.push(post_id.to_string());
        true
    }

    pub fn empty_runs(&self, account: &AccountId) -> u32 {
        self.consecutive_empty_runs
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_exhausted(&self, account: &AccountId) -> bool {
        self.exhausted_accounts.contains(account)
    }
}
