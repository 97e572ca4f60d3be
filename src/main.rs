//! Writeup-Harvest main entry point
//!
//! Command-line interface for the CTF write-up URL resolver.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use writeup_harvest::config::{load_config, validate, Config};
use writeup_harvest::crawler::crawl;
use writeup_harvest::output::print_report;

/// Writeup-Harvest: a CTF write-up URL resolver
///
/// Enumerates the tagged write-ups from the CTFtime index page and resolves
/// the canonical external write-up URL for each one, retrying transient
/// fetch failures with exponential backoff.
#[derive(Parser, Debug)]
#[command(name = "writeup-harvest")]
#[command(version)]
#[command(about = "Resolve canonical CTF write-up URLs", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the write-up catalog site
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write-up tag to filter the index on
    #[arg(long)]
    tag: Option<String>,

    /// Maximum number of detail pages fetched in parallel
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Maximum fetch attempts per write-up
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// Give up on unresolved rows after this many seconds
    #[arg(long, value_name = "SECS")]
    deadline_secs: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    tracing::info!(
        "Crawling {} for '{}' write-ups ({} parallel fetches, {} retries per row)",
        config.crawler.base_url,
        config.crawler.tag,
        config.crawler.max_concurrent_fetches,
        config.crawler.max_retries
    );

    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    if !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads the configuration file (if given), applies CLI overrides, validates
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.crawler.base_url = base_url.clone();
    }
    if let Some(tag) = &cli.tag {
        config.crawler.tag = tag.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(max_retries) = cli.max_retries {
        config.crawler.max_retries = max_retries;
    }
    if let Some(deadline) = cli.deadline_secs {
        config.crawler.deadline_secs = Some(deadline);
    }

    // Overrides bypass the file parser, so re-validate the merged result.
    validate(&config).context("invalid configuration")?;

    Ok(config)
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("writeup_harvest=info,warn"),
            1 => EnvFilter::new("writeup_harvest=debug,info"),
            2 => EnvFilter::new("writeup_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
