/// The part of the web a crawl is allowed to visit
///
/// Scope is a plain string prefix: a link is in scope when its canonical form
/// starts with the canonical seed URL. The prefix is fixed when the crawl
/// starts and never re-derived from redirects or later pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    prefix: String,
}

impl CrawlScope {
    /// Creates a scope rooted at an already canonical seed URL
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns true if the URL lies under the seed
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }
}
