use crate::config::types::{CollectorConfig, CrawlerConfig, OutputConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on parallel fetches
const MAX_CONCURRENCY: usize = 256;

/// Upper bound on the per-request timeout, in seconds
const MAX_DURATION_SECS: u64 = 3600;

/// Validates the entire configuration
pub fn validate(config: &CollectorConfig) -> ConfigResult<()> {
    validate_seed_url(&config.seed_url)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the seed URL: absolute, http or https
fn validate_seed_url(seed_url: &str) -> ConfigResult<()> {
    if seed_url.is_empty() {
        return Err(ConfigError::Validation("seed URL cannot be empty".to_string()));
    }

    let url = Url::parse(seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", seed_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "seed URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "seed URL has no host: '{}'",
            seed_url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.max_duration_secs < 1 || config.max_duration_secs > MAX_DURATION_SECS {
        return Err(ConfigError::Validation(format!(
            "max_duration must be between 1s and {}s, got {}s",
            MAX_DURATION_SECS, config.max_duration_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.sitemap_path.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> CollectorConfig {
        CollectorConfig {
            seed_url: "https://example.com".to_string(),
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_seed() {
        let mut config = valid_config();
        config.seed_url = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_relative_seed() {
        let mut config = valid_config();
        config.seed_url = "/just/a/path".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_seed() {
        let mut config = valid_config();
        config.seed_url = "ftp://example.com/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = valid_config();
        config.crawler.concurrency = 0;
        assert!(validate(&config).is_err());

        config.crawler.concurrency = MAX_CONCURRENCY + 1;
        assert!(validate(&config).is_err());

        config.crawler.concurrency = MAX_CONCURRENCY;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_max_duration_bounds() {
        let mut config = valid_config();
        config.crawler.max_duration_secs = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_duration_secs = u64::MAX;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.crawler.max_duration_secs = MAX_DURATION_SECS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_blank_user_agent() {
        let mut config = valid_config();
        config.crawler.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_sitemap_path() {
        let mut config = valid_config();
        config.output.sitemap_path = String::new();
        assert!(validate(&config).is_err());
    }
}
