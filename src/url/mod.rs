//! URL handling module for Listing-Pager
//!
//! This module provides start-URL validation, resolution of relative links
//! against the page they were found on, host comparison and the `page` query
//! parameter helpers used to build next-page URLs.

mod domain;
mod resolve;

pub use domain::{extract_domain, same_host};
pub use resolve::{is_same_page, page_param, parse_absolute, resolve_href, resolve_str, with_page_param};
