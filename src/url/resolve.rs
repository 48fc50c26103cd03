use crate::{UrlError, UrlResult};
use url::Url;

/// Name of the query parameter used for numbered pagination
const PAGE_PARAM: &str = "page";

/// Parses a string as an absolute HTTP(S) URL
///
/// Used to validate crawl start URLs before any extraction takes place.
///
/// # Examples
///
/// ```
/// use listing_pager::url::parse_absolute;
///
/// assert!(parse_absolute("https://example.com/career").is_ok());
/// assert!(parse_absolute("/career").is_err());
/// assert!(parse_absolute("   ").is_err());
/// ```
pub fn parse_absolute(input: &str) -> UrlResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(trimmed.to_string()));
    }

    Ok(url)
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: and data: links
/// - anything that is not HTTP(S) after resolution
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Resolves a URL string against a base, keeping absolute input verbatim
///
/// Already-absolute HTTP(S) URLs are returned trimmed but otherwise untouched,
/// so that fingerprints computed from extractor output stay stable. Relative
/// references are joined onto `base`.
pub fn resolve_str(href: &str, base: &Url) -> Option<String> {
    let trimmed = href.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            Some(trimmed.to_string())
        }
        Ok(_) => None,
        Err(_) => resolve_href(trimmed, base).map(String::from),
    }
}

/// Returns true if two URLs address the same document
///
/// Fragments and a trailing slash on the path are ignored.
pub fn is_same_page(a: &Url, b: &Url) -> bool {
    fn key(url: &Url) -> (String, Option<String>, Option<&str>) {
        let host = url.host_str().map(|h| h.to_lowercase()).unwrap_or_default();
        let path = url.path().trim_end_matches('/');
        (format!("{}{}", host, path), url.port().map(|p| p.to_string()), url.query())
    }
    key(a) == key(b)
}

/// Reads the numeric `page` query parameter, if any
pub fn page_param(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Returns a copy of `url` with the `page` query parameter set to `page`
///
/// Other query parameters keep their order; an existing `page` parameter is
/// replaced in place, otherwise one is appended.
pub fn with_page_param(url: &Url, page: u32) -> Url {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let value = page.to_string();
    match pairs.iter_mut().find(|(k, _)| k == PAGE_PARAM) {
        Some(pair) => pair.1 = value,
        None => pairs.push((PAGE_PARAM.to_string(), value)),
    }

    let mut next = url.clone();
    next.set_fragment(None);
    next.query_pairs_mut().clear().extend_pairs(pairs);
    next
}
