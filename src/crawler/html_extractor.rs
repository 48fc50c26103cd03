//! Rule-based [`Extractor`] backed by plain HTTP requests

use crate::config::{Config, ExtractorConfig, UserAgentConfig};
use crate::crawler::extractor::{ExtractionError, Extractor, PageExtraction};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::{parse_listing_page, ListingRules};
use crate::PagerError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches listing pages over HTTP and reads them with CSS selector rules
///
/// Each call to [`Extractor::extract_page`] is one GET request; the session
/// carries no state beyond the connection pool.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    client: Client,
    rules: ListingRules,
    timeout: Duration,
}

impl HtmlExtractor {
    /// Builds an extractor with the given rules and per-request timeout
    pub fn new(
        agent: &UserAgentConfig,
        config: ExtractorConfig,
        timeout_ms: u64,
    ) -> Result<Self, PagerError> {
        let client = build_http_client(agent)?;
        let rules = ListingRules::from_config(&config)?;

        Ok(Self {
            client,
            rules,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Builds an extractor from a loaded configuration file
    pub fn from_config(config: &Config) -> Result<Self, PagerError> {
        Self::new(
            &config.user_agent,
            config.extractor.clone(),
            config.crawler.extraction_timeout,
        )
    }
}

#[async_trait]
impl Extractor for HtmlExtractor {
    async fn extract_page(&mut self, url: &str) -> Result<PageExtraction, ExtractionError> {
        let page = fetch_page(&self.client, url, self.timeout).await?;

        let extraction = parse_listing_page(&page.body, &page.final_url, &self.rules);
        tracing::debug!(
            "Parsed {}: {} candidate items, page {}/{}, next: {}",
            page.final_url,
            extraction.items.len(),
            extraction.pagination.current_page,
            extraction.pagination.total_pages,
            extraction.pagination.next_url().unwrap_or("none")
        );

        Ok(extraction)
    }
}
