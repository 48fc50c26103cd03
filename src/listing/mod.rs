//! Listing data model
//!
//! This module defines the values that flow through a crawl:
//! - [`ListingItem`] and its fingerprint, the duplicate-detection key
//! - [`PaginationState`], the per-page pagination signal
//! - [`CrawlResult`], the accumulated output of one crawl

mod item;
mod pagination;
mod result;

pub use item::{fingerprint, normalize_title, ListingItem};
pub use pagination::PaginationState;
pub use result::{CrawlResult, CrawlWarning, FailureKind, TerminationReason};
