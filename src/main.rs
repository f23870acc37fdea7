//! Kagami main entry point
//!
//! This is the command-line interface for the Kagami site mirroring tool.

use anyhow::Context;
use clap::Parser;
use kagami::config::{load_config, validate, CrawlConfig, DEFAULT_SETTLE_MS, DEFAULT_WORKERS};
use kagami::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kagami: breadth-first site mirroring through headless Chrome
///
/// Kagami crawls a single site starting from a seed URL, follows every
/// in-domain anchor, and writes each in-scope response body into a local
/// directory tree mirroring the remote paths.
#[derive(Parser, Debug)]
#[command(name = "kagami")]
#[command(version)]
#[command(about = "Mirror a site through a rendering browser", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "TARGET", required_unless_present = "config")]
    target: Option<String>,

    /// Directory the mirror is written under
    #[arg(value_name = "OUT_DIR", required_unless_present = "config")]
    out_dir: Option<String>,

    /// Number of concurrent browser pages
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Milliseconds to let dynamic content settle after navigation
    #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
    settle_ms: u64,

    /// TOML file standing in for the positional arguments
    #[arg(long, value_name = "FILE", conflicts_with_all = ["target", "out_dir"])]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let stats = run_crawl(config).await.context("crawl session failed")?;

    tracing::info!(
        "Done: {} pages visited, {} artifacts saved",
        stats.pages_visited,
        stats.artifacts_saved
    );

    Ok(())
}

/// Builds the session configuration from the config file or the flags.
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    if let Some(path) = &cli.config {
        return load_config(path).with_context(|| format!("loading {}", path.display()));
    }

    // required_unless_present guarantees both positionals here
    let target = cli.target.as_deref().context("TARGET is required")?;
    let out_dir = cli.out_dir.as_deref().context("OUT_DIR is required")?;

    let mut config = CrawlConfig::new(target, out_dir);
    config.workers = cli.workers;
    config.settle_ms = cli.settle_ms;
    validate(&config)?;

    Ok(config)
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kagami=info,warn"),
            1 => EnvFilter::new("kagami=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
