//! Bot configuration stored under `.requote/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::filter::FilterRules;
use crate::core::types::AccountId;
use crate::io::x_client::DEFAULT_BASE_URL;

/// The timeline endpoint never returns more than this many posts per request.
pub const MAX_POSTS_PER_ACCOUNT_LIMIT: usize = 100;

/// Bot configuration (TOML).
///
/// Edited by the operator between runs; read once at the start of each run.
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BotConfig {
    /// Emergency stop. When false, `requote run` exits without touching state.
    pub enabled: bool,

    /// Source accounts (with or without a leading `@`).
    pub accounts: Vec<AccountId>,

    /// Upper bound on accounts probed per run.
    pub max_accounts_per_run: usize,

    /// Upper bound on recent posts fetched per probed account.
    pub max_posts_per_account: usize,

    /// Posts with fewer likes are never quoted.
    pub min_likes: u64,

    /// Empty runs in a row after which an account is retired for good.
    pub exhaustion_threshold: u32,

    /// Posts whose text contains any of these (case-insensitive) are skipped.
    pub forbidden_keywords: Vec<String>,

    pub fetch_failure_policy: FetchFailurePolicy,

    pub api_base_url: String,
}

/// Whether a failed timeline fetch counts as an empty run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Leave the account's counter untouched.
    #[default]
    Ignore,
    /// Treat the failure like a timeline with no candidate.
    CountAsEmpty,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            accounts: Vec::new(),
            max_accounts_per_run: 3,
            max_posts_per_account: 20,
            min_likes: 50,
            exhaustion_threshold: 5,
            forbidden_keywords: ["政治", "選挙", "宗教", "テロ", "差別", "戦争"]
                .into_iter()
                .map(String::from)
                .collect(),
            fetch_failure_policy: FetchFailurePolicy::Ignore,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_accounts_per_run == 0 {
            return Err(anyhow!("max_accounts_per_run must be > 0"));
        }
        if self.max_posts_per_account == 0
            || self.max_posts_per_account > MAX_POSTS_PER_ACCOUNT_LIMIT
        {
            return Err(anyhow!(
                "max_posts_per_account must be between 1 and {MAX_POSTS_PER_ACCOUNT_LIMIT}"
            ));
        }
        if self.exhaustion_threshold == 0 {
            return Err(anyhow!("exhaustion_threshold must be > 0"));
        }
        if let Some(account) = self.accounts.iter().find(|a| a.as_str().is_empty()) {
            return Err(anyhow!("accounts contains an empty handle ({account:?})"));
        }
        if let Some(index) = self
            .forbidden_keywords
            .iter()
            .position(|keyword| keyword.trim().is_empty())
        {
            return Err(anyhow!(
                "forbidden_keywords[{index}] is empty (it would match every post)"
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(anyhow!("api_base_url must not be empty"));
        }
        Ok(())
    }

    pub fn filter_rules(&self) -> FilterRules {
        FilterRules {
            min_likes: self.min_likes,
            forbidden_keywords: self.forbidden_keywords.clone(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BotConfig::default()`.
pub fn load_config(path: &Path) -> Result<BotConfig> {
    if !path.exists() {
        let cfg = BotConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BotConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &BotConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, BotConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let cfg = BotConfig {
            accounts: vec![AccountId::new("a"), AccountId::new("b")],
            fetch_failure_policy: FetchFailurePolicy::CountAsEmpty,
            ..BotConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_normalizes_accounts_and_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "enabled = false\naccounts = [\"@cats\", \"dogs\"]\nfetch_failure_policy = \"count_as_empty\"\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert!(!cfg.enabled);
        assert_eq!(cfg.accounts, vec![AccountId::new("cats"), AccountId::new("dogs")]);
        assert_eq!(cfg.fetch_failure_policy, FetchFailurePolicy::CountAsEmpty);
        assert_eq!(cfg.min_likes, 50);
        assert_eq!(cfg.exhaustion_threshold, 5);
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let cfg = BotConfig {
            max_accounts_per_run: 0,
            ..BotConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = BotConfig {
            max_posts_per_account: 101,
            ..BotConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = BotConfig {
            exhaustion_threshold: 0,
            ..BotConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_handle() {
        let cfg = BotConfig {
            accounts: vec![AccountId::new("@")],
            ..BotConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("empty handle"));
    }

    #[test]
    fn validate_rejects_blank_keyword() {
        let cfg = BotConfig {
            forbidden_keywords: vec!["war".to_string(), " ".to_string()],
            ..BotConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("forbidden_keywords[1] is empty"));
    }

    #[test]
    fn load_rejects_empty_keyword_in_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "forbidden_keywords = [\"\"]\n").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("forbidden_keywords[0]"));
    }
}
