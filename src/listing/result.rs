use crate::listing::{ListingItem, PaginationState};
use std::collections::HashSet;
use std::fmt;

/// Why an extraction stopped the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The extractor returned an error
    Error,
    /// The extractor did not answer within the configured timeout
    Timeout,
    /// The caller cancelled the crawl
    Cancelled,
}

/// Why a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The last extracted page had no next page
    NoNextPage,
    /// The page limit was hit while more pages were available
    PageLimitReached,
    /// Extraction of a page failed, timed out, or the crawl was cancelled
    ExtractionFailed(FailureKind),
    /// The start page yielded no items and no next page
    EmptyStart,
}

impl TerminationReason {
    /// Stable identifier, suitable for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoNextPage => "no_next_page",
            Self::PageLimitReached => "page_limit_reached",
            Self::ExtractionFailed(FailureKind::Error) => "extraction_failed",
            Self::ExtractionFailed(FailureKind::Timeout) => "extraction_timeout",
            Self::ExtractionFailed(FailureKind::Cancelled) => "cancelled",
            Self::EmptyStart => "empty_start",
        }
    }

    /// Returns true if the crawl stopped because of a failure or cancellation
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ExtractionFailed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::ExtractionFailed(FailureKind::Cancelled))
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal conditions observed during a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlWarning {
    /// A page reported `has_next` without a usable next URL
    MalformedPagination { page_url: String },
    /// An item URL could not be resolved to an absolute HTTP(S) URL
    UnresolvableItemUrl { page_url: String, url: String },
}

impl fmt::Display for CrawlWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPagination { page_url } => write!(
                f,
                "{} reported a next page without a usable URL; stopped there",
                page_url
            ),
            Self::UnresolvableItemUrl { page_url, url } => {
                write!(f, "dropped item with unresolvable URL '{}' on {}", url, page_url)
            }
        }
    }
}

/// Accumulated output of one crawl
///
/// Built by the crawl loop only: items are appended in discovery order and
/// never removed. Once handed back to the caller it is read-only.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    start_url: String,
    items: Vec<ListingItem>,
    seen: HashSet<String>,
    pages_visited: u32,
    pages_extracted: u32,
    terminated_reason: TerminationReason,
    last_error: Option<String>,
    last_pagination: Option<PaginationState>,
    warnings: Vec<CrawlWarning>,
}

impl CrawlResult {
    pub(crate) fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            items: Vec::new(),
            seen: HashSet::new(),
            pages_visited: 0,
            pages_extracted: 0,
            terminated_reason: TerminationReason::NoNextPage,
            last_error: None,
            last_pagination: None,
            warnings: Vec::new(),
        }
    }

    /// Appends `item` unless its fingerprint was already seen
    ///
    /// Returns true if the item was added.
    pub(crate) fn push_unique(&mut self, item: ListingItem) -> bool {
        if self.seen.insert(item.fingerprint()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub(crate) fn record_extraction(&mut self, pagination: PaginationState) {
        self.pages_extracted += 1;
        self.last_pagination = Some(pagination);
    }

    pub(crate) fn record_transition(&mut self) {
        self.pages_visited += 1;
    }

    pub(crate) fn warn(&mut self, warning: CrawlWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn finish(mut self, reason: TerminationReason, error: Option<String>) -> Self {
        self.terminated_reason = reason;
        self.last_error = error;
        self
    }

    /// The URL the crawl started from
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// Unique items in discovery order
    pub fn items(&self) -> &[ListingItem] {
        &self.items
    }

    /// Number of successful transitions to a new page
    ///
    /// The start page does not count: a crawl that extracted three pages
    /// reports 2.
    pub fn pages_visited(&self) -> u32 {
        self.pages_visited
    }

    /// Number of pages successfully extracted
    pub fn pages_extracted(&self) -> u32 {
        self.pages_extracted
    }

    pub fn terminated_reason(&self) -> TerminationReason {
        self.terminated_reason
    }

    /// Message of the failure that stopped the crawl, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Pagination signal of the last extracted page, after correction
    pub fn last_pagination(&self) -> Option<&PaginationState> {
        self.last_pagination.as_ref()
    }

    pub fn warnings(&self) -> &[CrawlWarning] {
        &self.warnings
    }

    /// Returns true if a fingerprint is part of this result
    pub fn contains_fingerprint(&self, fingerprint: &str) -> bool {
        self.seen.contains(fingerprint)
    }
}
