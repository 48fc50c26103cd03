//! Listing-Pager: a pagination-aware listing scraper
//!
//! This crate walks a paginated listing page (typically a company's career
//! page), collecting item links page after page. Extraction is delegated to an
//! [`crawler::Extractor`]; the crate owns the loop that accumulates deduplicated
//! items, follows pagination signals and decides when to stop.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Listing-Pager operations
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl input: {0}")]
    InvalidInput(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Listing-Pager operations
pub type Result<T> = std::result::Result<T, PagerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Extractor, ExtractionError, HtmlExtractor, PageCrawler, PageExtraction};
pub use listing::{
    fingerprint, normalize_title, CrawlResult, CrawlWarning, FailureKind, ListingItem,
    PaginationState, TerminationReason,
};
