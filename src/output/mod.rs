//! Output module for sitemap generation and crawl reporting
//!
//! This module handles:
//! - Writing the sitemap envelope and entries
//! - Formatting per-fetch progress lines
//! - Summarizing a finished crawl

mod sitemap;
pub mod stats;
mod traits;

pub use sitemap::XmlSitemapWriter;
pub use stats::{format_progress_line, print_summary, CrawlSummary};
pub use traits::{OutputError, OutputResult, SitemapWriter};
