use serde::Deserialize;

/// Default number of pages a crawl may advance through
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

/// Default bound on one page extraction (milliseconds)
pub const DEFAULT_EXTRACTION_TIMEOUT_MS: u64 = 60_000;

/// Main configuration structure for Listing-Pager
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "listing")]
    pub listings: Vec<ListingEntry>,
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of page transitions per crawl
    #[serde(rename = "page-limit", default = "default_page_limit")]
    pub page_limit: u32,

    /// Upper bound on a single page extraction (milliseconds)
    #[serde(rename = "extraction-timeout", default = "default_extraction_timeout")]
    pub extraction_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT_MS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Rules used by the HTML extractor to find items and pagination
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// CSS selector for candidate item links
    #[serde(rename = "item-selector", default = "default_item_selector")]
    pub item_selector: String,

    /// CSS selector for an explicit next-page link
    #[serde(rename = "next-selector", default = "default_next_selector")]
    pub next_selector: String,

    /// Case-insensitive words that disqualify a link from being an item
    #[serde(rename = "exclude-keywords", default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,

    /// Only keep items hosted on the same site as the listing page
    #[serde(rename = "same-host-only", default)]
    pub same_host_only: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            item_selector: default_item_selector(),
            next_selector: default_next_selector(),
            exclude_keywords: default_exclude_keywords(),
            same_host_only: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// SQLite file remembering fingerprints across runs; no memory when absent
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Path to the markdown report
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

/// One listing page to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    /// Label used in logs and reports, e.g. the company name
    pub name: String,

    #[serde(rename = "start-url")]
    pub start_url: String,
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_extraction_timeout() -> u64 {
    DEFAULT_EXTRACTION_TIMEOUT_MS
}

fn default_item_selector() -> String {
    "a[href]".to_string()
}

fn default_next_selector() -> String {
    "a[rel~='next'], link[rel~='next']".to_string()
}

fn default_exclude_keywords() -> Vec<String> {
    [
        "contact",
        "kontakt",
        "about",
        "imprint",
        "impressum",
        "privacy",
        "datenschutz",
        "cookie",
        "login",
        "sign in",
        "newsletter",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
