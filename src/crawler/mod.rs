//! Crawler module for paginated listing extraction
//!
//! This module contains the crawl loop and the pieces it drives:
//! - [`PageCrawler`], the pagination-aware multi-page loop
//! - the [`Extractor`] seam and its HTTP/HTML implementation
//! - HTTP fetching and listing page parsing used by [`HtmlExtractor`]

mod extractor;
mod fetcher;
mod html_extractor;
mod pager;
mod parser;

pub use extractor::{ExtractionError, Extractor, PageExtraction};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use html_extractor::HtmlExtractor;
pub use pager::PageCrawler;
pub use parser::{parse_listing_page, ListingRules};
