//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and failure classification
//! - HTML link extraction
//! - Bounded-concurrency dispatch
//! - Frontier bookkeeping (visited set, outstanding count)
//! - Overall crawl coordination and termination

mod coordinator;
mod dispatcher;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{collect, CancelHandle, Coordinator};
pub use dispatcher::{Dispatcher, FetchTask, Slot};
pub use fetcher::{
    build_http_client, is_html_content_type, FetchRequest, FetchResult, Fetcher, HttpFetcher,
};
pub use frontier::Frontier;
pub use parser::extract_links;
