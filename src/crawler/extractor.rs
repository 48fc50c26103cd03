//! The extraction seam between the crawl loop and whatever reads pages
//!
//! An [`Extractor`] represents one stateful, navigable session (a browser
//! context, an HTTP client with cookies, an LLM agent driving a browser...).
//! It is driven strictly sequentially: `extract_page` takes `&mut self`, so a
//! session can never have two extractions in flight.

use crate::listing::{ListingItem, PaginationState};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Items and pagination signal read from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtraction {
    /// Candidate items in page order; URLs may still be relative
    pub items: Vec<ListingItem>,

    pub pagination: PaginationState,
}

impl PageExtraction {
    pub fn new(items: Vec<ListingItem>, pagination: PaginationState) -> Self {
        Self { items, pagination }
    }
}

/// Failure to process a page
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed content at {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Extraction of {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },
}

impl ExtractionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A capability that reads one page and returns its items plus pagination
///
/// Implementations may be rule-based HTML scrapers, headless browsers or LLM
/// agents; the crawl loop treats them as a black box.
#[async_trait]
pub trait Extractor: Send {
    /// Loads `url` and extracts the items and pagination signal it shows
    async fn extract_page(&mut self, url: &str) -> Result<PageExtraction, ExtractionError>;
}

#[async_trait]
impl<E: Extractor + ?Sized> Extractor for Box<E> {
    async fn extract_page(&mut self, url: &str) -> Result<PageExtraction, ExtractionError> {
        (**self).extract_page(url).await
    }
}
