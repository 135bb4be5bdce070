//! Orchestration for a single `requote run`.
//!
//! One invocation probes a random sample of the non-exhausted accounts, quotes
//! at most one post, updates the exhaustion counters and persists the state.
//! There is no in-process loop; the next run is started by an external
//! scheduler.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::caption::CaptionWriter;
use crate::core::exhaustion;
use crate::core::sampler::{AccountSampler, eligible_accounts};
use crate::core::types::AccountId;
use crate::io::config::{BotConfig, FetchFailurePolicy};
use crate::io::init::BotPaths;
use crate::io::platform::{Platform, PlatformError};
use crate::io::state_store::{load_state, write_state};
use crate::search::{SearchOutcome, search};
use crate::state::RunState;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Search and report candidates without publishing or touching state.
    pub dry_run: bool,
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The enable flag is off; nothing was read or written.
    Disabled,
    /// Every configured account is exhausted (or none are configured).
    NoEligibleAccounts,
    /// The run went through the sampled accounts.
    Finished(RunSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Live,
    DryRun,
    /// No platform client (credentials missing): nothing fetched, counters untouched.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: RunMode,
    /// Accounts chosen for this run, in probe order.
    pub sampled: Vec<AccountId>,
    /// One entry per account actually considered.
    pub probes: Vec<AccountProbe>,
    pub published: Option<Published>,
    pub newly_exhausted: Vec<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProbe {
    pub account: AccountId,
    pub result: ProbeResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Not fetched because the platform client is unavailable.
    Skipped,
    /// The fetched window held no candidate.
    Empty { scanned: usize, consecutive_empty: u32 },
    /// Fetch failed. `consecutive_empty` is set when the failure was counted as an empty run.
    FetchFailed {
        error: String,
        consecutive_empty: Option<u32>,
    },
    /// Candidate found in dry-run mode; not published.
    Candidate { post_id: String },
    Published { post_id: String, new_id: String },
    PublishFailed { post_id: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub account: AccountId,
    pub source_id: String,
    pub source_url: String,
    pub new_id: String,
}

/// Execute one run against in-memory state.
///
/// `platform` is `None` when no client could be configured. The caller is
/// responsible for persisting `state` afterwards (see [`run_from_root`]).
pub fn run_once<P, S, C>(
    cfg: &BotConfig,
    state: &mut RunState,
    platform: Option<&P>,
    sampler: &mut S,
    captions: &C,
    options: &RunOptions,
) -> RunOutcome
where
    P: Platform,
    S: AccountSampler,
    C: CaptionWriter,
{
    if !cfg.enabled {
        info!("bot is disabled (enabled = false), exiting");
        return RunOutcome::Disabled;
    }

    let pool = eligible_accounts(&cfg.accounts, state);
    if pool.is_empty() {
        warn!(
            configured = cfg.accounts.len(),
            exhausted = state.exhausted_accounts.len(),
            "no eligible accounts (all exhausted or none configured)"
        );
        return RunOutcome::NoEligibleAccounts;
    }

    let sampled = sampler.sample(&pool, cfg.max_accounts_per_run);
    info!(
        pool = pool.len(),
        sampled = %join_accounts(&sampled),
        "selected accounts for this run"
    );

    let Some(platform) = platform else {
        warn!("platform client unavailable (credentials missing); skipping fetch and publish");
        let probes = sampled
            .iter()
            .map(|account| AccountProbe {
                account: account.clone(),
                result: ProbeResult::Skipped,
            })
            .collect();
        return RunOutcome::Finished(RunSummary {
            mode: RunMode::Degraded,
            sampled,
            probes,
            published: None,
            newly_exhausted: Vec::new(),
        });
    };

    let mode = if options.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Live
    };
    let rules = cfg.filter_rules();
    let mut probes = Vec::new();
    let mut published = None;
    let mut newly_exhausted = Vec::new();
    let mut track_empty = |state: &mut RunState, account: &AccountId| -> u32 {
        if mode == RunMode::DryRun {
            return state.empty_runs(account);
        }
        let update = exhaustion::record(state, account, false, cfg.exhaustion_threshold);
        if update.newly_exhausted {
            info!(account = %account, consecutive_empty = update.consecutive_empty, "account exhausted");
            newly_exhausted.push(account.clone());
        }
        update.consecutive_empty
    };

    for account in &sampled {
        info!(account = %account, "checking account");
        let result = match search(
            platform,
            account,
            state,
            &rules,
            cfg.max_posts_per_account,
        ) {
            SearchOutcome::NotFound { scanned } => {
                let consecutive_empty = track_empty(state, account);
                info!(account = %account, scanned, consecutive_empty, "no candidate");
                ProbeResult::Empty {
                    scanned,
                    consecutive_empty,
                }
            }
            SearchOutcome::FetchFailed(err) => {
                // A handle that no longer resolves is permanent scarcity, not an outage.
                let counts = matches!(err, PlatformError::UnknownAccount(_))
                    || cfg.fetch_failure_policy == FetchFailurePolicy::CountAsEmpty;
                let consecutive_empty = counts.then(|| track_empty(state, account));
                ProbeResult::FetchFailed {
                    error: err.to_string(),
                    consecutive_empty,
                }
            }
            SearchOutcome::Found(post) if mode == RunMode::DryRun => {
                info!(account = %account, post_id = %post.id, url = %post.url(), "[dry-run] candidate found");
                probes.push(AccountProbe {
                    account: account.clone(),
                    result: ProbeResult::Candidate { post_id: post.id },
                });
                break;
            }
            SearchOutcome::Found(post) => {
                exhaustion::record(state, account, true, cfg.exhaustion_threshold);
                let caption = captions.caption(&post.text);
                let url = post.url();
                match platform.publish_quote(&caption, &url) {
                    Ok(new_id) => {
                        state.mark_posted(&post.id);
                        info!(account = %account, post_id = %post.id, new_id = %new_id, "quoted post");
                        published = Some(Published {
                            account: account.clone(),
                            source_id: post.id.clone(),
                            source_url: url,
                            new_id: new_id.clone(),
                        });
                        probes.push(AccountProbe {
                            account: account.clone(),
                            result: ProbeResult::Published {
                                post_id: post.id,
                                new_id,
                            },
                        });
                        break;
                    }
                    Err(err) => {
                        warn!(account = %account, post_id = %post.id, error = %err, "publish failed");
                        ProbeResult::PublishFailed {
                            post_id: post.id,
                            error: err.to_string(),
                        }
                    }
                }
            }
        };
        probes.push(AccountProbe {
            account: account.clone(),
            result,
        });
    }

    if published.is_none() && mode == RunMode::Live {
        info!("no post was published this run");
    }

    RunOutcome::Finished(RunSummary {
        mode,
        sampled,
        probes,
        published,
        newly_exhausted,
    })
}

/// Load state from `root`, execute one run and persist the result.
///
/// State is written back whenever the run reached the sampled accounts
/// (including degraded runs and runs that published nothing). Disabled runs,
/// runs with no eligible account and dry runs leave the document untouched.
pub fn run_from_root<P, S, C>(
    root: &Path,
    cfg: &BotConfig,
    platform: Option<&P>,
    sampler: &mut S,
    captions: &C,
    options: &RunOptions,
) -> Result<RunOutcome>
where
    P: Platform,
    S: AccountSampler,
    C: CaptionWriter,
{
    if !cfg.enabled {
        info!("bot is disabled (enabled = false), exiting");
        return Ok(RunOutcome::Disabled);
    }

    let paths = BotPaths::new(root);
    let mut state = load_state(&paths.state_path).context("load state for run")?;
    let outcome = run_once(cfg, &mut state, platform, sampler, captions, options);

    if matches!(outcome, RunOutcome::Finished(_)) && !options.dry_run {
        write_state(&paths.state_path, &state).context("persist state after run")?;
    }
    Ok(outcome)
}

fn join_accounts(accounts: &[AccountId]) -> String {
    accounts
        .iter()
        .map(AccountId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
