use crate::config::types::{ArchiveConfig, Config, CrawlerConfig, OutputConfig, RendererConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_archive_config(&config.archive)?;
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates archive addressing
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
    validate_http_scheme(&base, "base-url")?;

    if !config.search_url.contains("{page}") {
        return Err(ConfigError::Validation(format!(
            "search-url must contain the '{{page}}' placeholder, got '{}'",
            config.search_url
        )));
    }

    let sample = Url::parse(&config.page_url(0))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search-url: {}", e)))?;
    validate_http_scheme(&sample, "search-url")?;

    if config.item_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "item-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_scheme(url: &Url, key: &str) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            key,
            url.scheme()
        )));
    }
    Ok(())
}

/// Validates the page range
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.start_page > config.end_page {
        return Err(ConfigError::Validation(format!(
            "start-page ({}) must not be greater than end-page ({})",
            config.start_page, config.end_page
        )));
    }
    Ok(())
}

fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.export_path.is_empty() {
        return Err(ConfigError::Validation(
            "export-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
