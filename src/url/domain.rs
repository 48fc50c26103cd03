use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use listing_pager::url::extract_domain;
///
/// let url = Url::parse("https://Careers.Example.COM/jobs").unwrap();
/// assert_eq!(extract_domain(&url), Some("careers.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs point at the same host
///
/// A leading `www.` is ignored on either side, so `www.example.com` and
/// `example.com` compare equal. Ports are not compared.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(ha), Some(hb)) => strip_www(&ha) == strip_www(&hb),
        _ => false,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
