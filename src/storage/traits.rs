//! Storage traits and error types
//!
//! This module defines the trait interface for fingerprint stores and
//! associated error types.

use crate::listing::ListingItem;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Memory of listing items seen in earlier runs, keyed by fingerprint
///
/// The crawl loop never talks to a store; callers filter a finished
/// [`crate::CrawlResult`] through one to find the items that are new.
pub trait FingerprintStore {
    /// Returns true if an item with this fingerprint was remembered before
    fn contains(&self, fingerprint: &str) -> StorageResult<bool>;

    /// Remembers `item`
    ///
    /// Returns true if the item was not known yet. Remembering a known item
    /// keeps its original record.
    fn remember(&mut self, item: &ListingItem) -> StorageResult<bool>;

    /// Number of remembered items
    fn count(&self) -> StorageResult<u64>;
}
