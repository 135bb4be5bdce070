//! Test-only helpers: scripted platform, deterministic samplers and post builders.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::core::sampler::AccountSampler;
use crate::core::types::{AccountId, MediaKind, Post};
use crate::io::config::{BotConfig, write_config};
use crate::io::init::BotPaths;
use crate::io::platform::{Platform, PlatformError, PlatformResult};
use crate::io::state_store::{load_state, write_state};
use crate::state::RunState;

/// Post with a video attachment.
pub fn video_post(author: &str, id: &str, likes: u64) -> Post {
    Post {
        id: id.to_string(),
        text: format!("{author} clip {id}"),
        likes,
        media: vec![MediaKind::Video],
        author: AccountId::new(author),
    }
}

/// Post without any attachment.
pub fn text_post(author: &str, id: &str, likes: u64) -> Post {
    Post {
        media: Vec::new(),
        text: format!("{author} note {id}"),
        ..video_post(author, id, likes)
    }
}

/// In-memory platform replaying canned timelines and recording every call.
#[derive(Default)]
pub struct ScriptedPlatform {
    timelines: HashMap<String, Vec<Post>>,
    failing_fetch: HashSet<String>,
    unknown_accounts: HashSet<String>,
    failing_publish: HashSet<String>,
    fetch_calls: RefCell<Vec<(String, usize)>>,
    published: RefCell<Vec<(String, String)>>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeline(mut self, account: &str, posts: Vec<Post>) -> Self {
        self.set_timeline(account, posts);
        self
    }

    pub fn with_fetch_error(mut self, account: &str) -> Self {
        self.failing_fetch.insert(AccountId::new(account).to_string());
        self
    }

    /// Fetching `account` fails because the handle no longer resolves.
    pub fn with_unknown_account(mut self, account: &str) -> Self {
        self.unknown_accounts
            .insert(AccountId::new(account).to_string());
        self
    }

    /// Publishing a quote of `post_id` fails with an API error.
    pub fn with_publish_error(mut self, post_id: &str) -> Self {
        self.failing_publish.insert(post_id.to_string());
        self
    }

    pub fn set_timeline(&mut self, account: &str, posts: Vec<Post>) {
        self.timelines
            .insert(AccountId::new(account).to_string(), posts);
    }

    /// `(account, max_count)` for every fetch, in call order.
    pub fn fetch_calls(&self) -> Vec<(String, usize)> {
        self.fetch_calls.borrow().clone()
    }

    pub fn fetched_accounts(&self) -> Vec<String> {
        self.fetch_calls
            .borrow()
            .iter()
            .map(|(account, _)| account.clone())
            .collect()
    }

    /// `(caption, quoted_url)` for every successful publish.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.borrow().clone()
    }
}

impl Platform for ScriptedPlatform {
    fn fetch_recent(&self, account: &AccountId, max_count: usize) -> PlatformResult<Vec<Post>> {
        self.fetch_calls
            .borrow_mut()
            .push((account.to_string(), max_count));
        if self.unknown_accounts.contains(account.as_str()) {
            return Err(PlatformError::UnknownAccount(account.to_string()));
        }
        if self.failing_fetch.contains(account.as_str()) {
            return Err(PlatformError::Network("connection reset".to_string()));
        }
        Ok(self
            .timelines
            .get(account.as_str())
            .map(|posts| posts.iter().take(max_count).cloned().collect())
            .unwrap_or_default())
    }

    fn publish_quote(&self, caption: &str, quoted_url: &str) -> PlatformResult<String> {
        let quoted_id = quoted_url.rsplit('/').next().unwrap_or_default();
        if self.failing_publish.contains(quoted_id) {
            return Err(PlatformError::Api {
                status: 403,
                message: "duplicate content".to_string(),
            });
        }
        let mut published = self.published.borrow_mut();
        published.push((caption.to_string(), quoted_url.to_string()));
        Ok(format!("quote-{}", published.len()))
    }
}

/// Picks accounts in pool order.
pub struct InOrderSampler;

impl AccountSampler for InOrderSampler {
    fn sample(&mut self, pool: &[AccountId], count: usize) -> Vec<AccountId> {
        pool.iter().take(count).cloned().collect()
    }
}

/// Picks accounts in a fixed preference order, then the rest in pool order.
pub struct PreferenceSampler {
    order: Vec<AccountId>,
}

impl PreferenceSampler {
    pub fn new(order: &[&str]) -> Self {
        Self {
            order: order.iter().map(|s| AccountId::new(s)).collect(),
        }
    }
}

impl AccountSampler for PreferenceSampler {
    fn sample(&mut self, pool: &[AccountId], count: usize) -> Vec<AccountId> {
        let preferred = self.order.iter().filter(|id| pool.contains(id));
        let rest = pool.iter().filter(|id| !self.order.contains(id));
        preferred.chain(rest).take(count).cloned().collect()
    }
}

/// Temporary project root with `.requote/` paths.
pub struct TestBot {
    dir: TempDir,
    pub paths: BotPaths,
}

impl TestBot {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let paths = BotPaths::new(dir.path());
        Ok(Self { dir, paths })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, cfg: &BotConfig) -> Result<()> {
        write_config(&self.paths.config_path, cfg)
    }

    pub fn write_state(&self, state: &RunState) -> Result<()> {
        write_state(&self.paths.state_path, state)
    }

    pub fn read_state(&self) -> Result<RunState> {
        load_state(&self.paths.state_path)
    }
}

/// Config probing `accounts` with the given exhaustion threshold.
pub fn config_with_accounts(accounts: &[&str], threshold: u32) -> BotConfig {
    BotConfig {
        accounts: accounts.iter().map(|s| AccountId::new(s)).collect(),
        exhaustion_threshold: threshold,
        forbidden_keywords: vec!["war".to_string()],
        ..BotConfig::default()
    }
}
