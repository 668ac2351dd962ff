//! Configuration module for Site-Collector
//!
//! Settings come from command-line flags, optionally layered over a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use site_collector::config::{build_config, CliOverrides};
//!
//! let config = build_config("https://example.com", None, CliOverrides::default()).unwrap();
//! println!("Crawling with concurrency {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CliOverrides, CollectorConfig, CrawlerConfig, FileConfig, OutputConfig, DEFAULT_SITEMAP_PATH,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{build_config, load_file_config};
pub use validation::validate;
