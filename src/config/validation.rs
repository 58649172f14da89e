use crate::config::types::{Config, FetcherConfig, OutputConfig, SourcesConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_sources(&config.sources)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.page_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "page_delay_ms must be <= 60000ms, got {}ms",
            config.page_delay_ms
        )));
    }

    Ok(())
}

/// Validates the per-category listing URLs
fn validate_sources(sources: &SourcesConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("vehicles", &sources.vehicles),
        ("motorcycles", &sources.motorcycles),
        ("rentals", &sources.rentals),
    ] {
        validate_listing_url(name, value)?;
    }
    Ok(())
}

fn validate_listing_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} URL '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} URL '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.raw_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "raw_dir cannot be empty".to_string(),
        ));
    }

    if config.cleaned_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "cleaned_dir cannot be empty".to_string(),
        ));
    }

    if !config.delimiter.is_ascii() || config.delimiter == '"' || config.delimiter == '\n' {
        return Err(ConfigError::Validation(format!(
            "delimiter must be a single ASCII character other than a quote or newline, got {:?}",
            config.delimiter
        )));
    }

    Ok(())
}
