//! HTML parser for listing pages
//!
//! This module turns a fetched listing page into a [`PageExtraction`]:
//! - candidate item links, filtered with the configured rules
//! - a pagination signal built from `rel="next"` links, "Next"/"Weiter"
//!   controls and "Page X of Y" style indicators

use crate::config::ExtractorConfig;
use crate::crawler::extractor::PageExtraction;
use crate::listing::{ListingItem, PaginationState};
use crate::url::{is_same_page, page_param, resolve_href, same_host, with_page_param};
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Link texts that move forward through a listing
const NEXT_WORDS: &[&str] = &[
    "next",
    "next page",
    "weiter",
    "nächste",
    "nächste seite",
    ">",
    ">>",
    "›",
    "»",
    "→",
];

/// Link texts of other pagination controls
const OTHER_PAGER_WORDS: &[&str] = &[
    "prev",
    "previous",
    "previous page",
    "zurück",
    "vorherige",
    "first",
    "last",
    "erste",
    "letzte",
    "<",
    "<<",
    "‹",
    "«",
    "←",
    "...",
    "…",
];

/// Containers that hold page links and "1 / 4" indicators
///
/// Plain `nav` elements are not included: site menus often carry numeric
/// links (years, counts) that are not page numbers.
const PAGER_CONTAINER_SELECTOR: &str =
    "[class*='pagination'], [class*='pager'], [class*='paging']";

/// Compiled form of [`ExtractorConfig`]
#[derive(Debug, Clone)]
pub struct ListingRules {
    item_selector: Selector,
    next_selector: Selector,
    anchor_selector: Selector,
    pager_selector: Selector,
    exclude_keywords: Vec<String>,
    same_host_only: bool,
    page_of_pattern: Regex,
    fraction_pattern: Regex,
}

impl ListingRules {
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            item_selector: parse_selector(&config.item_selector)?,
            next_selector: parse_selector(&config.next_selector)?,
            anchor_selector: parse_selector("a[href]")?,
            pager_selector: parse_selector(PAGER_CONTAINER_SELECTOR)?,
            exclude_keywords: config
                .exclude_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            same_host_only: config.same_host_only,
            page_of_pattern: parse_regex(
                r"(?i)\b(?:page|seite)\s+(\d{1,4})\s*(?:of|von|/)\s*(\d{1,4})\b",
            )?,
            fraction_pattern: parse_regex(r"\b(\d{1,4})\s*/\s*(\d{1,4})\b")?,
        })
    }

    /// Returns true if the link reads as site navigation ("About us",
    /// `/impressum`) rather than an item that happens to contain a keyword
    fn is_excluded(&self, title: &str, url: &Url) -> bool {
        let title = title.to_lowercase();
        let path = url.path().to_lowercase();

        self.exclude_keywords.iter().any(|keyword| {
            let keyword: Vec<&str> = words(keyword).collect();
            dominated_by(&words(&title).collect::<Vec<_>>(), &keyword)
                || path
                    .split('/')
                    .any(|segment| dominated_by(&words(segment).collect::<Vec<_>>(), &keyword))
        })
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// True if `keyword` occurs as a word sequence in `text` and makes up at least
/// half of its words
///
/// Words match by prefix so compounds like "Datenschutzerklärung" still hit
/// "datenschutz".
fn dominated_by(text: &[&str], keyword: &[&str]) -> bool {
    if keyword.is_empty() || text.len() < keyword.len() || keyword.len() * 2 < text.len() {
        return false;
    }

    text.windows(keyword.len())
        .any(|window| window.iter().zip(keyword).all(|(w, k)| w.starts_with(k)))
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

fn parse_regex(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Validation(e.to_string()))
}

/// Parses a listing page into items and a pagination signal
///
/// # Example
///
/// ```
/// use listing_pager::config::ExtractorConfig;
/// use listing_pager::crawler::{parse_listing_page, ListingRules};
/// use url::Url;
///
/// let rules = ListingRules::from_config(&ExtractorConfig::default()).unwrap();
/// let html = r#"<ul><li><a href="/jobs/1">Rust Engineer</a></li></ul>
///               <div class="pagination"><a href="?page=2" rel="next">Next</a></div>"#;
/// let page = Url::parse("https://example.com/career").unwrap();
/// let extraction = parse_listing_page(html, &page, &rules);
///
/// assert_eq!(extraction.items.len(), 1);
/// assert_eq!(extraction.items[0].url, "https://example.com/jobs/1");
/// assert_eq!(
///     extraction.pagination.next_url.as_deref(),
///     Some("https://example.com/career?page=2")
/// );
/// ```
pub fn parse_listing_page(html: &str, page_url: &Url, rules: &ListingRules) -> PageExtraction {
    let document = Html::parse_document(html);

    let items = extract_items(&document, page_url, rules);
    let pagination = detect_pagination(&document, page_url, rules);

    PageExtraction::new(items, pagination)
}

/// Extracts candidate item links in document order
fn extract_items(document: &Html, page_url: &Url, rules: &ListingRules) -> Vec<ListingItem> {
    let mut items = Vec::new();

    for element in document.select(&rules.item_selector) {
        let attrs = element.value();
        if attrs.attr("download").is_some() || is_pager_rel(attrs.attr("rel")) {
            continue;
        }

        let Some(url) = attrs.attr("href").and_then(|href| resolve_href(href, page_url)) else {
            continue;
        };

        if is_same_page(&url, page_url) {
            continue;
        }

        if rules.same_host_only && !same_host(&url, page_url) {
            continue;
        }

        let title = element_title(&element);
        if title.is_empty() || is_pager_control(&title) || rules.is_excluded(&title, &url) {
            continue;
        }

        items.push(ListingItem::new(title, url.to_string()));
    }

    items
}

/// Builds the pagination signal for a page
fn detect_pagination(document: &Html, page_url: &Url, rules: &ListingRules) -> PaginationState {
    let indicator = find_indicator(document, rules);

    let current_page = indicator
        .map(|(current, _)| current)
        .or_else(|| page_param(page_url))
        .unwrap_or(1)
        .max(1);

    let total_pages = indicator
        .map(|(_, total)| total)
        .or_else(|| highest_page_link(document, rules))
        .unwrap_or(current_page)
        .max(current_page);

    let next_url = find_next_link(document, page_url, rules)
        .filter(|next| !is_same_page(next, page_url))
        .or_else(|| numbered_page_link(document, page_url, rules, current_page + 1))
        .or_else(|| {
            // Numbered pagination without a usable link: derive ?page=N+1
            (current_page < total_pages).then(|| with_page_param(page_url, current_page + 1))
        })
        .filter(|next| !is_same_page(next, page_url));

    PaginationState {
        current_page,
        total_pages,
        has_next: next_url.is_some(),
        next_url: next_url.map(String::from),
    }
}

/// Finds an explicit next-page link
///
/// Tries the configured selector first, then any anchor whose text, label or
/// class marks it as a forward control.
fn find_next_link(document: &Html, page_url: &Url, rules: &ListingRules) -> Option<Url> {
    let explicit = document
        .select(&rules.next_selector)
        .filter_map(|el| el.value().attr("href"))
        .find_map(|href| resolve_href(href, page_url));

    explicit.or_else(|| {
        document
            .select(&rules.anchor_selector)
            .filter(is_next_control)
            .filter_map(|el| el.value().attr("href"))
            .find_map(|href| resolve_href(href, page_url))
    })
}

fn is_next_control(element: &ElementRef) -> bool {
    let attrs = element.value();
    let label_matches = [
        Some(element_text(element)),
        attrs.attr("aria-label").map(collapse_whitespace),
        attrs.attr("title").map(collapse_whitespace),
    ]
    .into_iter()
    .flatten()
    .any(|label| NEXT_WORDS.contains(&label.to_lowercase().as_str()));

    label_matches || attrs.classes().any(|class| class.eq_ignore_ascii_case("next"))
}

/// Reads a "Page X of Y" / "X / Y" indicator as (current, total)
fn find_indicator(document: &Html, rules: &ListingRules) -> Option<(u32, u32)> {
    let pager_texts: Vec<String> = document
        .select(&rules.pager_selector)
        .map(|el| element_text(&el))
        .collect();

    let in_pager = pager_texts.iter().find_map(|text| {
        capture_pair(&rules.page_of_pattern, text)
            .or_else(|| capture_pair(&rules.fraction_pattern, text))
    });

    in_pager.or_else(|| {
        let body = document.root_element().text().collect::<Vec<_>>().join(" ");
        capture_pair(&rules.page_of_pattern, &collapse_whitespace(&body))
    })
}

fn capture_pair(pattern: &Regex, text: &str) -> Option<(u32, u32)> {
    pattern.captures_iter(text).find_map(|caps| {
        let current: u32 = caps.get(1)?.as_str().parse().ok()?;
        let total: u32 = caps.get(2)?.as_str().parse().ok()?;
        (current >= 1 && current <= total).then_some((current, total))
    })
}

/// Link labelled `page` inside a pagination container
fn numbered_page_link(
    document: &Html,
    page_url: &Url,
    rules: &ListingRules,
    page: u32,
) -> Option<Url> {
    let label = page.to_string();
    document
        .select(&rules.pager_selector)
        .flat_map(|container| container.select(&rules.anchor_selector))
        .filter(|a| element_text(a) == label)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_href(href, page_url))
        .find(|url| !is_same_page(url, page_url))
}

/// Largest numbered page link inside a pagination container
fn highest_page_link(document: &Html, rules: &ListingRules) -> Option<u32> {
    document
        .select(&rules.pager_selector)
        .flat_map(|container| container.select(&rules.anchor_selector))
        .filter_map(|a| element_text(&a).parse::<u32>().ok())
        .max()
}

fn is_pager_rel(rel: Option<&str>) -> bool {
    rel.map(|rel| {
        rel.split_whitespace()
            .any(|r| r.eq_ignore_ascii_case("next") || r.eq_ignore_ascii_case("prev"))
    })
    .unwrap_or(false)
}

fn is_pager_control(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.chars().all(|c| c.is_ascii_digit())
        || NEXT_WORDS.contains(&lower.as_str())
        || OTHER_PAGER_WORDS.contains(&lower.as_str())
}

/// Display title of a link: its text, else its `title` or `aria-label`
fn element_title(element: &ElementRef) -> String {
    let text = element_text(element);
    if !text.is_empty() {
        return text;
    }

    let attrs = element.value();
    attrs
        .attr("title")
        .or_else(|| attrs.attr("aria-label"))
        .map(collapse_whitespace)
        .unwrap_or_default()
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
