//! Output module for crawl reports
//!
//! This module handles generating markdown reports that list, per listing
//! source, how the crawl ended and which items it found.

mod markdown;

pub use markdown::{format_markdown_report, write_markdown_report};

use crate::listing::{CrawlResult, ListingItem};
use crate::storage::{retain_unseen, FingerprintStore};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Outcome of crawling one configured listing
#[derive(Debug, Clone)]
pub struct ListingReport {
    /// Listing name from the configuration
    pub name: String,

    pub result: CrawlResult,

    /// Items not seen in earlier runs; all items when no store is used
    pub new_items: Vec<ListingItem>,
}

impl ListingReport {
    pub fn new(name: impl Into<String>, result: CrawlResult, new_items: Vec<ListingItem>) -> Self {
        Self {
            name: name.into(),
            result,
            new_items,
        }
    }

    /// Report where every crawled item counts as new
    pub fn all_new(name: impl Into<String>, result: CrawlResult) -> Self {
        let new_items = result.items().to_vec();
        Self::new(name, result, new_items)
    }

    /// Report whose new items are those `store` has not seen before
    ///
    /// A storage failure does not lose the crawl: it is logged and every item
    /// is reported as new.
    pub fn from_store<S>(name: impl Into<String>, result: CrawlResult, store: &mut S) -> Self
    where
        S: FingerprintStore + ?Sized,
    {
        let name = name.into();
        match retain_unseen(result.items(), store) {
            Ok(new_items) => Self::new(name, result, new_items),
            Err(e) => {
                tracing::error!(
                    "Failed to update fingerprints for {}: {}; reporting all items as new",
                    name,
                    e
                );
                Self::all_new(name, result)
            }
        }
    }

    pub fn is_new(&self, item: &ListingItem) -> bool {
        let fingerprint = item.fingerprint();
        self.new_items.iter().any(|i| i.fingerprint() == fingerprint)
    }
}
