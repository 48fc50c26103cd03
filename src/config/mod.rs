//! Configuration module for Listing-Pager
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use listing_pager::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("listings.toml")).unwrap();
//! println!("Each crawl may advance {} pages", config.crawler.page_limit);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, ExtractorConfig, ListingEntry, OutputConfig, UserAgentConfig,
    DEFAULT_EXTRACTION_TIMEOUT_MS, DEFAULT_PAGE_LIMIT,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
