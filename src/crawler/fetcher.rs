//! HTTP fetcher for listing pages
//!
//! This module handles all HTTP requests made by the HTML extractor:
//! - Building the client with the crawler's user agent string
//! - GET requests bounded by a per-request timeout
//! - Mapping transport, status and Content-Type problems onto
//!   [`ExtractionError`]

use crate::config::UserAgentConfig;
use crate::crawler::extractor::ExtractionError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for one page
const MAX_REDIRECTS: usize = 10;

/// Connection establishment timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; the base for resolving relative links
    pub final_url: Url,

    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    pub body: String,
}

/// Builds an HTTP client identifying itself with the configured user agent
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
///
/// # Example
///
/// ```no_run
/// use listing_pager::config::UserAgentConfig;
/// use listing_pager::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "ListingPager".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one listing page
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML or no Content-Type | `Ok(FetchedPage)` |
/// | 2xx with another Content-Type | `Malformed` |
/// | Non-2xx status | `HttpStatus` |
/// | Request exceeds `timeout` | `Timeout` |
/// | Connection, TLS or redirect failure | `Navigation` |
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, ExtractionError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, timeout, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractionError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    if let Some(content_type) = &content_type {
        if !is_html(content_type) {
            return Err(ExtractionError::Malformed {
                url: url.to_string(),
                message: format!("expected HTML, got {}", content_type),
            });
        }
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_error(url, timeout, e))?;

    tracing::debug!("Fetched {} ({} bytes) from {}", final_url, body.len(), url);

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

fn classify_error(url: &str, timeout: Duration, error: reqwest::Error) -> ExtractionError {
    if error.is_timeout() {
        return ExtractionError::Timeout {
            url: url.to_string(),
            after: timeout,
        };
    }

    let message = if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_redirect() {
        format!("redirect error: {}", error)
    } else {
        error.to_string()
    };

    ExtractionError::Navigation {
        url: url.to_string(),
        message,
    }
}
