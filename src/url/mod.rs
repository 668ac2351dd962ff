//! URL handling module for Site-Collector
//!
//! This module provides URL canonicalization and the seed-prefix scope check
//! that keeps a crawl on one site.

mod normalize;
mod scope;

pub use normalize::canonicalize_url;
pub use scope::CrawlScope;
