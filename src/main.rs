use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber;

mod batch;
mod classify;
mod config;
mod engine;
mod output;
mod source;

use batch::{CancelToken, Orchestrator, ProgressBarObserver};
use classify::Classifier;
use config::Config;
use output::export::build_export;
use output::Reporter;
use source::discover::find_repositories;
use source::GitSource;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository URLs, owner/name shorthands, or local paths
    repos: Vec<String>,

    /// Search this directory tree for git repositories instead
    #[arg(long, value_name = "PATH", conflicts_with = "repos")]
    discover: Option<PathBuf>,

    /// Maximum directory depth when searching for repositories
    #[arg(long, default_value = "3")]
    depth: usize,

    /// Only count commits authored within this window (e.g. 30d, 2m, 1y)
    #[arg(long)]
    since: Option<String>,

    /// Write the full report to this file
    #[arg(short, long)]
    output: Option<String>,

    /// Output file format (json, text)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Number of contributors in the terminal leaderboard
    #[arg(short, long, default_value = "10")]
    top: usize,

    /// Per-repository fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum concurrent repository fetches
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// `owner/name` shorthands become GitHub URLs; URLs and existing local
/// paths pass through untouched.
fn expand_identifier(arg: &str) -> String {
    let looks_remote = arg.starts_with("http://")
        || arg.starts_with("https://")
        || arg.starts_with("ssh://")
        || arg.starts_with("git://")
        || arg.starts_with("git@");

    if looks_remote || Path::new(arg).exists() {
        return arg.to_string();
    }

    if arg.matches('/').count() == 1 && !arg.starts_with('/') && !arg.ends_with('/') {
        return format!("https://github.com/{arg}");
    }

    arg.to_string()
}

/// Parse a time window like "30d", "2m", "1y" into a duration.
/// Approximations: 1 month = 30 days, 1 year = 365 days.
fn parse_since(s: &str) -> Result<chrono::Duration> {
    let s = s.trim();
    if s.len() < 2 {
        bail!("invalid --since value: {s:?} (expected e.g. 30d, 2m, 1y)");
    }

    let (num_str, unit) = s.split_at(s.len() - 1);
    let n: i64 = num_str
        .parse()
        .with_context(|| format!("invalid --since value: {s:?} (expected e.g. 30d, 2m, 1y)"))?;
    if n <= 0 {
        bail!("--since must be positive, got {s:?}");
    }

    let days = match unit {
        "d" => n,
        "w" => n * 7,
        "m" => n * 30,
        "y" => n * 365,
        _ => bail!("unknown unit in --since: {s:?} (use d, w, m or y)"),
    };

    Ok(chrono::Duration::days(days))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    println!(
        "{}",
        "ContribRank - Multi-Repository Contributor Leaderboard"
            .bright_cyan()
            .bold()
    );

    let config = Config::load()?;
    let fetch_timeout = Duration::from_secs(cli.timeout.unwrap_or(config.fetch.timeout_secs));
    let max_concurrent = cli.jobs.unwrap_or(config.fetch.max_concurrent);

    let identifiers: Vec<String> = if let Some(root) = &cli.discover {
        info!(
            "Searching for git repositories under {} (depth {})",
            root.display(),
            cli.depth
        );
        let repos = find_repositories(root, cli.depth);
        info!("Found {} repositories", repos.len());
        repos.into_iter().map(|p| p.display().to_string()).collect()
    } else {
        cli.repos.iter().map(|arg| expand_identifier(arg)).collect()
    };

    if identifiers.is_empty() {
        bail!("no repositories to analyze (pass identifiers, or --discover a search path)");
    }

    let since = cli.since.as_deref().map(parse_since).transpose()?;
    println!(
        "Repositories: {}",
        identifiers.len().to_string().bright_white()
    );
    if let Some(window) = &cli.since {
        println!("Time window: last {}", window.bright_white());
    }

    let classifier = Classifier::with_rules(config.classifier_rules())?;
    let source = GitSource::new()?;
    let orchestrator = Orchestrator::new(source, fetch_timeout, max_concurrent);

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Cancellation requested, letting in-flight fetches finish");
                cancel.cancel();
            }
        });
    }

    info!("Starting batch analysis...");
    let progress = Arc::new(ProgressBarObserver::new(identifiers.len()));
    let report = orchestrator.run(&identifiers, since, cancel, progress).await?;

    let export = build_export(
        &report,
        &classifier,
        config.leaderboard.overall_size,
        config.leaderboard.human_size,
    );
    let console_entries = engine::rank(&report.tally.author_totals, Some(cli.top));
    output::console::print_report(&export, &console_entries);

    if let Some(path) = &cli.output {
        let reporter = Reporter::new(&cli.format, path)?;
        reporter.write_report(&export)?;
    }

    if export.summary.successful_repositories == 0 {
        bail!("no repository could be analyzed");
    }

    println!("\n{}", "Analysis complete!".bright_green().bold());

    Ok(())
}
