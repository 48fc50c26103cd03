use crate::config::types::{
    Config, CrawlerConfig, ExtractorConfig, ListingEntry, OutputConfig, UserAgentConfig,
};
use crate::url::parse_absolute;
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Upper bound on `page-limit`
const MAX_PAGE_LIMIT: u32 = 100;

/// Lower bound on `extraction-timeout` (milliseconds)
const MIN_EXTRACTION_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extractor_config(&config.extractor)?;
    validate_output_config(&config.output)?;
    validate_listings(&config.listings)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.page_limit < 1 || config.page_limit > MAX_PAGE_LIMIT {
        return Err(ConfigError::Validation(format!(
            "page_limit must be between 1 and {}, got {}",
            MAX_PAGE_LIMIT, config.page_limit
        )));
    }

    if config.extraction_timeout < MIN_EXTRACTION_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "extraction_timeout must be >= {}ms, got {}ms",
            MIN_EXTRACTION_TIMEOUT_MS, config.extraction_timeout
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("item_selector", &config.item_selector),
        ("next_selector", &config.next_selector),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, selector, e))
        })?;
    }

    if config.exclude_keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "exclude_keywords cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.database_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_listings(listings: &[ListingEntry]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();

    for entry in listings {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "listing name cannot be empty".to_string(),
            ));
        }

        if !names.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate listing name '{}'",
                name
            )));
        }

        parse_absolute(&entry.start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL for '{}': {}", name, e))
        })?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::Validation(format!("Invalid email format: '{}'", email));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }

    Ok(())
}
