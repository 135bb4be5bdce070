//! Scheduled quote-reposting bot.
//!
//! Each `requote run` probes a few source accounts, quotes at most one post
//! with video and records the outcome in `.requote/state.json`. Scheduling is
//! left to cron or a CI workflow.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use requote::core::caption::VerbatimCaption;
use requote::core::sampler::RandomSampler;
use requote::exit_codes;
use requote::io::config::load_config;
use requote::io::credentials::Credentials;
use requote::io::init::{BotPaths, InitOptions, init_bot};
use requote::io::x_client::XClient;
use requote::logging;
use requote::run::{ProbeResult, RunMode, RunOptions, RunOutcome, RunSummary, run_from_root};
use requote::status::status_from_root;

#[derive(Parser)]
#[command(
    name = "requote",
    version,
    about = "Scheduled bot that quotes video posts from a list of accounts"
)]
struct Cli {
    /// Project root containing `.requote/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.requote/config.toml` and an empty `.requote/state.json`.
    Init {
        /// Overwrite existing files (also clears all counters and exhaustion).
        #[arg(short, long)]
        force: bool,
    },
    /// Probe sampled accounts and quote at most one post.
    Run {
        /// Report the candidate without publishing or writing state.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print posted count, per-account counters and exhausted accounts.
    Status,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Init { force } => cmd_init(&cli.root, force),
        Command::Run { dry_run } => cmd_run(&cli.root, dry_run),
        Command::Status => cmd_status(&cli.root),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<i32> {
    let paths = init_bot(root, &InitOptions { force })?;
    println!("initialized {}", paths.bot_dir.display());
    Ok(exit_codes::OK)
}

fn cmd_run(root: &Path, dry_run: bool) -> Result<i32> {
    let paths = BotPaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config for run")?;

    let client = match Credentials::from_env() {
        Some(credentials) => match XClient::with_base_url(credentials, &cfg.api_base_url) {
            Ok(client) => Some(client),
            Err(err) => {
                warn!(error = %err, "could not build X client");
                None
            }
        },
        None => {
            warn!("X credentials not set; running without a platform client");
            None
        }
    };

    let mut sampler = RandomSampler::from_thread_rng();
    let outcome = run_from_root(
        root,
        &cfg,
        client.as_ref(),
        &mut sampler,
        &VerbatimCaption,
        &RunOptions { dry_run },
    )?;

    Ok(match outcome {
        RunOutcome::Disabled => {
            println!("disabled");
            exit_codes::DISABLED
        }
        RunOutcome::NoEligibleAccounts => {
            println!("no eligible accounts");
            exit_codes::NO_ELIGIBLE
        }
        RunOutcome::Finished(summary) => {
            print!("{}", render_summary(&summary));
            exit_codes::OK
        }
    })
}

fn cmd_status(root: &Path) -> Result<i32> {
    let paths = BotPaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config for status")?;
    let report = status_from_root(root, &cfg)?;
    print!("{}", report.render());
    Ok(exit_codes::OK)
}

/// One line per probed account, then the published quote (if any).
fn render_summary(summary: &RunSummary) -> String {
    let mut buf = String::new();
    match summary.mode {
        RunMode::Live => {}
        RunMode::DryRun => buf.push_str("dry run: nothing published, state unchanged\n"),
        RunMode::Degraded => buf.push_str("degraded: no platform client, nothing fetched\n"),
    }
    for probe in &summary.probes {
        let line = match &probe.result {
            ProbeResult::Skipped => "skipped".to_string(),
            ProbeResult::Empty {
                scanned,
                consecutive_empty,
            } => format!("empty (scanned {scanned}, empty_runs={consecutive_empty})"),
            ProbeResult::FetchFailed {
                error,
                consecutive_empty,
            } => match consecutive_empty {
                Some(count) => format!("fetch failed: {error} (empty_runs={count})"),
                None => format!("fetch failed: {error}"),
            },
            ProbeResult::Candidate { post_id } => format!("candidate {post_id}"),
            ProbeResult::Published { post_id, new_id } => {
                format!("quoted {post_id} as {new_id}")
            }
            ProbeResult::PublishFailed { post_id, error } => {
                format!("publish of {post_id} failed: {error}")
            }
        };
        buf.push_str(&format!("{}: {}\n", probe.account, line));
    }
    for account in &summary.newly_exhausted {
        buf.push_str(&format!("{account}: exhausted\n"));
    }
    match &summary.published {
        Some(published) => buf.push_str(&format!("published {}\n", published.source_url)),
        None if summary.mode == RunMode::Live => buf.push_str("nothing published\n"),
        None => {}
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use requote::core::types::AccountId;
    use requote::run::{AccountProbe, Published};

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::parse_from(["requote", "run"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(matches!(cli.command, Command::Run { dry_run: false }));
    }

    #[test]
    fn parse_run_dry_run_with_root() {
        let cli = Cli::parse_from(["requote", "run", "--dry-run", "--root", "/srv/bot"]);
        assert_eq!(cli.root, PathBuf::from("/srv/bot"));
        assert!(matches!(cli.command, Command::Run { dry_run: true }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["requote", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_status() {
        let cli = Cli::parse_from(["requote", "--root", "bot", "status"]);
        assert_eq!(cli.root, PathBuf::from("bot"));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn summary_lists_probes_and_published_url() {
        let summary = RunSummary {
            mode: RunMode::Live,
            sampled: vec![AccountId::new("a"), AccountId::new("b")],
            probes: vec![
                AccountProbe {
                    account: AccountId::new("a"),
                    result: ProbeResult::Empty {
                        scanned: 20,
                        consecutive_empty: 5,
                    },
                },
                AccountProbe {
                    account: AccountId::new("b"),
                    result: ProbeResult::Published {
                        post_id: "9".to_string(),
                        new_id: "100".to_string(),
                    },
                },
            ],
            published: Some(Published {
                account: AccountId::new("b"),
                source_id: "9".to_string(),
                source_url: "https://x.com/b/status/9".to_string(),
                new_id: "100".to_string(),
            }),
            newly_exhausted: vec![AccountId::new("a")],
        };

        let rendered = render_summary(&summary);
        assert_eq!(
            rendered,
            "a: empty (scanned 20, empty_runs=5)\n\
             b: quoted 9 as 100\n\
             a: exhausted\n\
             published https://x.com/b/status/9\n"
        );
    }
}
