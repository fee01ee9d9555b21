use crate::config::types::{Config, FetchConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 60_000;
const MAX_CONCURRENT_DETAILS: u32 = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must not carry a query or fragment",
            config.base_url
        )));
    }

    if config.excluded_category.trim().is_empty() {
        return Err(ConfigError::Validation(
            "excluded-category cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates timeouts and concurrency limits
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("liveness-timeout-ms", config.liveness_timeout_ms),
        ("discovery-timeout-ms", config.discovery_timeout_ms),
        ("listing-timeout-ms", config.listing_timeout_ms),
        ("detail-timeout-ms", config.detail_timeout_ms),
    ] {
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between {} and {}ms, got {}ms",
                name, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS, value
            )));
        }
    }

    if config.max_concurrent_listings == Some(0) {
        return Err(ConfigError::Validation(
            "max-concurrent-listings must be >= 1 when set".to_string(),
        ));
    }

    if config.max_concurrent_details < 1 || config.max_concurrent_details > MAX_CONCURRENT_DETAILS
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-details must be between 1 and {}, got {}",
            MAX_CONCURRENT_DETAILS, config.max_concurrent_details
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_none() && config.json_path.is_none() {
        return Err(ConfigError::Validation(
            "at least one of database-path or json-path must be set".to_string(),
        ));
    }

    for (name, value) in [
        ("database-path", &config.database_path),
        ("json-path", &config.json_path),
        ("summary-path", &config.summary_path),
    ] {
        if matches!(value, Some(path) if path.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
