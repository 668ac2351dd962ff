//! Crawl statistics and progress reporting
//!
//! This module formats the one-line progress report emitted per completed
//! fetch and the summary returned when a crawl finishes.

use crate::crawler::FetchResult;
use chrono::{DateTime, Utc};

/// Summary of one finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Distinct URLs scheduled, the seed included
    pub processed: usize,

    /// Fetches that completed (successfully or not)
    pub fetched: usize,

    /// Entries written to the sitemap
    pub pages_written: usize,

    /// Fetches that did not return a success status
    pub failures: usize,

    /// Highest number of fetches observed in flight at once
    pub peak_in_flight: usize,

    /// Whether the crawl was cancelled before the frontier drained
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Wall-clock length of the crawl in seconds
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Prints the closing summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    if summary.cancelled {
        println!("Crawl cancelled.");
    }
    println!("Well done, {} URLs processed.", summary.processed);
    println!(
        "  Fetched: {}, failed: {}, sitemap entries: {}, in {:.2}s",
        summary.fetched,
        summary.failures,
        summary.pages_written,
        summary.duration_secs()
    );
}

/// Formats the progress line for one completed fetch
///
/// `{status}, {size}M, {duration}s, {links}, {outstanding}: {url}`, followed
/// by ` <- ERROR: {reason}, parent: {parent}` when the fetch failed.
pub fn format_progress_line(result: &FetchResult, outstanding: usize) -> String {
    let status = result
        .status_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "---".to_string());

    let prefix = format!(
        "{}, {:.2}M, {:.2}s, {}, {}:",
        status,
        result.size_bytes as f64 / 1024.0 / 1024.0,
        result.duration.as_secs_f64(),
        result.links.len(),
        outstanding
    );

    if result.is_success() {
        format!("{} {}", prefix, result.url)
    } else {
        format!(
            "{} {} <- ERROR: {}, parent: {}",
            prefix,
            result.url,
            result.status_reason.as_deref().unwrap_or("unknown error"),
            result.parent_url
        )
    }
}
