use crate::config::types::{CliOverrides, CollectorConfig, FileConfig};
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads the optional TOML configuration file
///
/// Missing tables and keys fall back to their defaults.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_collector::config::load_file_config;
///
/// let file = load_file_config(Path::new("collector.toml")).unwrap();
/// println!("Concurrency: {}", file.crawler.concurrency);
/// ```
pub fn load_file_config(path: &Path) -> ConfigResult<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Builds and validates the configuration for one crawl
///
/// # Arguments
///
/// * `seed_url` - The URL the crawl starts from
/// * `file` - Optional path to a TOML configuration file
/// * `overrides` - Values passed explicitly on the command line
///
/// # Returns
///
/// * `Ok(CollectorConfig)` - Merged and validated configuration
/// * `Err(ConfigError)` - The file could not be read or a value is out of range
pub fn build_config(
    seed_url: &str,
    file: Option<&Path>,
    overrides: CliOverrides,
) -> ConfigResult<CollectorConfig> {
    let base = match file {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };

    let mut crawler = base.crawler;
    let mut output = base.output;

    if let Some(concurrency) = overrides.concurrency {
        crawler.concurrency = concurrency;
    }
    if let Some(secs) = overrides.max_duration_secs {
        crawler.max_duration_secs = secs;
    }
    if let Some(user_agent) = overrides.user_agent {
        crawler.user_agent = user_agent;
    }
    if let Some(path) = overrides.sitemap_path {
        output.sitemap_path = path;
    }

    let config = CollectorConfig {
        seed_url: seed_url.trim().to_string(),
        crawler,
        output,
    };

    validate(&config)?;

    Ok(config)
}
