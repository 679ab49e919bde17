use crate::config::types::{Config, CrawlerConfig, OutputConfig, SearchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.results_timeout_secs < 1 || config.results_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "results_timeout_secs must be between 1 and 300, got {}",
            config.results_timeout_secs
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.sort_param.is_empty() {
        return Err(ConfigError::Validation(
            "sort_param cannot be empty".to_string(),
        ));
    }

    // The parameter is spliced into a query string; reserved characters
    // would change its meaning
    if config.sort_param.contains(['=', '&', '?']) {
        return Err(ConfigError::Validation(format!(
            "sort_param must not contain query delimiters, got '{}'",
            config.sort_param
        )));
    }

    if config.newest_value.is_empty() {
        return Err(ConfigError::Validation(
            "newest_value cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.rows_dir.is_empty() {
        return Err(ConfigError::Validation(
            "rows_dir cannot be empty".to_string(),
        ));
    }

    if config.image_dir.is_empty() {
        return Err(ConfigError::Validation(
            "image_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
