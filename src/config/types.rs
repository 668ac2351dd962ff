use serde::Deserialize;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "User-Agent: LinkCheckerBot / 0.0.1";

/// Default sitemap output path
pub const DEFAULT_SITEMAP_PATH: &str = "sitemap.xml";

/// Complete configuration for one crawl invocation
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// The seed URL the crawl starts from; also the scope prefix
    pub seed_url: String,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Optional TOML file contents. The seed always comes from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of fetches running at the same time
    pub concurrency: usize,

    /// Timeout budget for a single fetch (seconds)
    #[serde(rename = "max-duration")]
    pub max_duration_secs: u64,

    /// User agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            max_duration_secs: 6,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Per-fetch timeout as a `Duration`
    pub fn max_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.max_duration_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the sitemap file; rewritten from scratch on every crawl
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: DEFAULT_SITEMAP_PATH.to_string(),
        }
    }
}

/// Values given explicitly on the command line; each one wins over the file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub concurrency: Option<usize>,
    pub max_duration_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub sitemap_path: Option<String>,
}
