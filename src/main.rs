//! Site-Collector main entry point
//!
//! This is the command-line interface for the Site-Collector sitemap crawler.

use anyhow::Context;
use clap::Parser;
use site_collector::config::{build_config, CliOverrides, CollectorConfig};
use site_collector::crawler::{Coordinator, HttpFetcher};
use site_collector::output::print_summary;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Collector: crawl one site and write its sitemap
///
/// Starting from URL, follows every link that stays under URL, and writes a
/// sitemap.xml entry for each HTML page it reaches.
#[derive(Parser, Debug)]
#[command(name = "site-collector")]
#[command(version, disable_version_flag = true)]
#[command(about = "Crawl a web site and generate sitemap.xml", long_about = None)]
struct Cli {
    /// URL to the target web-site (http://example.com)
    #[arg(value_name = "URL")]
    url: String,

    /// Number of concurrent requests [default: 1]
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Max response duration in seconds [default: 6]
    #[arg(short = 'd', long = "max-duration", alias = "max_duration")]
    max_duration: Option<u64>,

    /// User agent used for requests
    #[arg(long = "useragent")]
    user_agent: Option<String>,

    /// Sitemap file written during the scan [default: sitemap.xml]
    #[arg(long)]
    sitemap: Option<String>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (repeat for more)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print version
    #[allow(dead_code)]
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage errors exit with 1; --help and --version exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = CliOverrides {
        concurrency: cli.concurrency,
        max_duration_secs: cli.max_duration,
        user_agent: cli.user_agent,
        sitemap_path: cli.sitemap,
    };

    let config = build_config(&cli.url, cli.config.as_deref(), overrides)
        .context("Invalid configuration")?;

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_collector=info,warn"),
            1 => EnvFilter::new("site_collector=debug,info"),
            2 => EnvFilter::new("site_collector=trace,debug"),
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

/// Handles the main crawl operation
async fn handle_crawl(config: CollectorConfig) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let coordinator = Coordinator::new(&config.seed_url, config.crawler.clone(), fetcher)?;

    // Ctrl-C stops scheduling new pages; the sitemap is still closed.
    let cancel = coordinator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight requests");
            cancel.cancel();
        }
    });

    let sitemap_path = Path::new(&config.output.sitemap_path);
    match coordinator.collect(sitemap_path).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).with_context(|| format!("Crawl of {} failed", config.seed_url))
        }
    }
}
