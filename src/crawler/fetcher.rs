//! Page fetching
//!
//! This module handles:
//! - The `FetchResult` record every completed fetch produces
//! - The `Fetcher` trait the coordinator calls
//! - An HTTP implementation on top of `reqwest`
//! - Error classification into failure records

use crate::crawler::parser::extract_links;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};

/// Outcome of one fetch
///
/// Failures are ordinary values: a transport error has `status_code: None`
/// and a populated `status_reason`.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The requested URL
    pub url: String,

    /// The page this URL was discovered on; empty for the seed
    pub parent_url: String,

    /// Time spent on the fetch
    pub duration: Duration,

    /// HTTP status code, `None` if no response was received
    pub status_code: Option<u16>,

    /// Reason text for non-success statuses and transport failures
    pub status_reason: Option<String>,

    /// Content-Type header value, empty if unknown
    pub content_type: String,

    /// Length of the response body
    pub size_bytes: u64,

    /// Absolute URLs found in the document; empty unless it was HTML
    pub links: Vec<String>,
}

impl FetchResult {
    /// Builds a failure record for a fetch that never produced a response
    pub fn failed(
        url: impl Into<String>,
        parent_url: impl Into<String>,
        duration: Duration,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            parent_url: parent_url.into(),
            duration,
            status_code: None,
            status_reason: Some(reason.into()),
            content_type: String::new(),
            size_bytes: 0,
            links: Vec::new(),
        }
    }

    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(code) if (200..300).contains(&code))
    }

    /// Returns true if the content type indicates an HTML document
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }
}

/// Returns true if a Content-Type value names HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// One fetch to perform
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub parent_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

/// Source of pages for the crawler
///
/// Implementations must not fail past their own boundary: timeouts, DNS
/// errors and non-HTML content all come back as a `FetchResult`.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult;
}

/// Builds the shared HTTP client
///
/// The user agent and timeout are set per request, so one client serves the
/// whole crawl.
///
/// # Example
///
/// ```no_run
/// use site_collector::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL and extracts its links
    ///
    /// # Request Flow
    ///
    /// 1. Send GET with the configured user agent and timeout
    ///    (redirects are followed, up to 10 hops)
    /// 2. Read the whole body to measure its size
    /// 3. On a 2xx HTML response, extract links relative to the final URL
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx, HTML | status, links |
    /// | 2xx, other type | status, no links |
    /// | non-2xx | status + canonical reason, no links |
    /// | Timeout | no status, "Request timeout" |
    /// | Connect error | no status, "Connection failed: ..." |
    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        let started = Instant::now();

        let response = match self
            .client
            .get(&request.url)
            .header(USER_AGENT, request.user_agent.as_str())
            .timeout(request.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return FetchResult::failed(
                    &request.url,
                    &request.parent_url,
                    started.elapsed(),
                    describe_error(&e),
                );
            }
        };

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return FetchResult::failed(
                    &request.url,
                    &request.parent_url,
                    started.elapsed(),
                    describe_error(&e),
                );
            }
        };

        let links = if status.is_success() && is_html_content_type(&content_type) {
            extract_links(&String::from_utf8_lossy(&body), &final_url)
        } else {
            Vec::new()
        };

        let status_reason = if status.is_success() {
            None
        } else {
            Some(
                status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            )
        };

        FetchResult {
            url: request.url.clone(),
            parent_url: request.parent_url.clone(),
            duration: started.elapsed(),
            status_code: Some(status.as_u16()),
            status_reason,
            content_type,
            size_bytes: body.len() as u64,
            links,
        }
    }
}

/// Classifies a transport error into a reason string
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    }
}
