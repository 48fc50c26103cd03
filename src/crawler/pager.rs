//! Pagination-aware multi-page extraction loop
//!
//! [`PageCrawler`] repeatedly drives an [`Extractor`] over a paginated
//! listing, merging new items into a [`CrawlResult`] and following the
//! pagination signal until one of the termination conditions fires:
//!
//! - the page has no next page
//! - the page limit is reached
//! - extraction fails, times out or the crawl is cancelled
//!
//! Failures after validation never discard accumulated items; the partial
//! result is returned with the reason recorded.

use crate::config::{CrawlerConfig, DEFAULT_EXTRACTION_TIMEOUT_MS, DEFAULT_PAGE_LIMIT};
use crate::crawler::extractor::{ExtractionError, Extractor, PageExtraction};
use crate::listing::{CrawlResult, CrawlWarning, FailureKind, ListingItem, TerminationReason};
use crate::url::{parse_absolute, resolve_href, resolve_str};
use crate::PagerError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;

/// Drives sequential page extractions against one listing source
#[derive(Debug, Clone)]
pub struct PageCrawler {
    page_limit: u32,
    timeout: Duration,
    cancel: CancellationToken,
}

impl Default for PageCrawler {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout: Duration::from_millis(DEFAULT_EXTRACTION_TIMEOUT_MS),
            cancel: CancellationToken::new(),
        }
    }
}

impl PageCrawler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a crawler using the limits from the `[crawler]` section
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new()
            .with_page_limit(config.page_limit)
            .with_timeout(Duration::from_millis(config.extraction_timeout))
    }

    /// Maximum number of transitions to a new page
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Bound on each individual page extraction
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses `token` for cooperative cancellation
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Token that cancels crawls run by this crawler
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls the listing starting at `start_url`
    ///
    /// Pages are extracted strictly one after another. Cancellation is checked
    /// before each extraction; a cancelled, failed or timed-out extraction ends
    /// the crawl with whatever was accumulated so far.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - The crawl ran, possibly ending early
    /// * `Err(PagerError::InvalidInput)` - `start_url` is not an absolute
    ///   HTTP(S) URL or the page limit is zero; nothing was extracted
    ///
    /// # Example
    ///
    /// ```no_run
    /// use listing_pager::{HtmlExtractor, PageCrawler};
    /// use listing_pager::config::{ExtractorConfig, UserAgentConfig};
    ///
    /// # async fn example(agent: UserAgentConfig) -> Result<(), Box<dyn std::error::Error>> {
    /// let mut extractor = HtmlExtractor::new(&agent, ExtractorConfig::default(), 30_000)?;
    /// let result = PageCrawler::new()
    ///     .with_page_limit(3)
    ///     .crawl("https://example.com/career", &mut extractor)
    ///     .await?;
    /// println!("{} items ({})", result.items().len(), result.terminated_reason());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl<E>(&self, start_url: &str, extractor: &mut E) -> Result<CrawlResult, PagerError>
    where
        E: Extractor + ?Sized,
    {
        let start = self.validate_input(start_url)?;
        let span = tracing::info_span!("crawl", start_url = %start);
        Ok(self.run(start, extractor).instrument(span).await)
    }

    /// Blocking variant of [`PageCrawler::crawl`]
    ///
    /// Runs the crawl on a private current-thread runtime. Must not be called
    /// from within an async context.
    pub fn crawl_blocking<E>(&self, start_url: &str, extractor: &mut E) -> Result<CrawlResult, PagerError>
    where
        E: Extractor + ?Sized,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.crawl(start_url, extractor))
    }

    fn validate_input(&self, start_url: &str) -> Result<Url, PagerError> {
        if self.page_limit < 1 {
            return Err(PagerError::InvalidInput(
                "page_limit must be at least 1".to_string(),
            ));
        }

        parse_absolute(start_url)
            .map_err(|e| PagerError::InvalidInput(format!("invalid start URL: {}", e)))
    }

    async fn run<E>(&self, start: Url, extractor: &mut E) -> CrawlResult
    where
        E: Extractor + ?Sized,
    {
        let mut result = CrawlResult::new(start.as_str());
        let mut current = start;
        let mut visited = 0u32;

        let (reason, error) = loop {
            if visited >= self.page_limit {
                tracing::info!("Page limit of {} reached, stopping", self.page_limit);
                break (TerminationReason::PageLimitReached, None);
            }

            if self.cancel.is_cancelled() {
                tracing::warn!("Crawl cancelled before extracting {}", current);
                break (
                    TerminationReason::ExtractionFailed(FailureKind::Cancelled),
                    Some("crawl cancelled".to_string()),
                );
            }

            let page = match self.extract(extractor, &current).await {
                Ok(page) => page,
                Err(e) => {
                    let kind = if e.is_timeout() {
                        FailureKind::Timeout
                    } else {
                        FailureKind::Error
                    };
                    tracing::warn!(
                        "Extraction failed on {}: {}; keeping {} items",
                        current,
                        e,
                        result.items().len()
                    );
                    break (TerminationReason::ExtractionFailed(kind), Some(e.to_string()));
                }
            };

            let first_page = result.pages_extracted() == 0;
            let PageExtraction {
                items,
                mut pagination,
            } = page;

            let found = items.len();
            let added = merge_items(&mut result, items, &current);

            if pagination.enforce_next_url() {
                tracing::warn!(
                    "{} reported a next page without a URL; treating it as the last page",
                    current
                );
                result.warn(CrawlWarning::MalformedPagination {
                    page_url: current.to_string(),
                });
            }

            let next = if pagination.has_next {
                let resolved = pagination
                    .next_url()
                    .and_then(|next| resolve_href(next, &current));
                if resolved.is_none() {
                    tracing::warn!(
                        "Next page URL {:?} on {} cannot be resolved; treating it as the last page",
                        pagination.next_url,
                        current
                    );
                    pagination.has_next = false;
                    result.warn(CrawlWarning::MalformedPagination {
                        page_url: current.to_string(),
                    });
                }
                resolved
            } else {
                None
            };

            tracing::info!(
                "Page {}/{}: {} items found, {} new, from {}",
                pagination.current_page,
                pagination.total_pages,
                found,
                added,
                current
            );
            result.record_extraction(pagination);

            match next {
                Some(next) => {
                    tracing::debug!("Following next page {}", next);
                    current = next;
                    visited += 1;
                    result.record_transition();
                }
                None if first_page && result.items().is_empty() => {
                    tracing::info!("Start page has no items and no next page");
                    break (TerminationReason::EmptyStart, None);
                }
                None => {
                    tracing::info!("No more pages available, stopping");
                    break (TerminationReason::NoNextPage, None);
                }
            }
        };

        let result = result.finish(reason, error);
        tracing::info!(
            "Crawl finished ({}): {} unique items over {} pages",
            result.terminated_reason(),
            result.items().len(),
            result.pages_extracted()
        );
        result
    }

    async fn extract<E>(&self, extractor: &mut E, url: &Url) -> Result<PageExtraction, ExtractionError>
    where
        E: Extractor + ?Sized,
    {
        match tokio::time::timeout(self.timeout, extractor.extract_page(url.as_str())).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ExtractionError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }),
        }
    }
}

/// Merges one page's candidates into the result, returning how many were new
///
/// Relative item URLs are resolved against the page they were found on; items
/// whose URL cannot be resolved are dropped with a warning.
fn merge_items(result: &mut CrawlResult, items: Vec<ListingItem>, page: &Url) -> usize {
    let mut added = 0;

    for item in items {
        let Some(url) = resolve_str(&item.url, page) else {
            tracing::warn!("Dropping item '{}' with unresolvable URL '{}'", item.title, item.url);
            result.warn(CrawlWarning::UnresolvableItemUrl {
                page_url: page.to_string(),
                url: item.url,
            });
            continue;
        };

        let item = ListingItem {
            title: item.title,
            url,
        };
        if result.push_unique(item) {
            added += 1;
        } else {
            tracing::debug!("Skipping duplicate item on {}", page);
        }
    }

    added
}
