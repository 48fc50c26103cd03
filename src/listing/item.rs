use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One discovered item, e.g. a link to a job posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    /// Display text, original casing preserved
    pub title: String,

    /// Absolute URL of the item
    pub url: String,
}

impl ListingItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Duplicate-detection key for this item
    ///
    /// See [`fingerprint`].
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.title, &self.url)
    }
}

/// Normalizes a title for comparison
///
/// Trims, collapses every internal whitespace run to a single space and
/// lowercases. The input is never modified.
///
/// # Examples
///
/// ```
/// use listing_pager::normalize_title;
///
/// assert_eq!(normalize_title("  Senior   Rust\tEngineer "), "senior rust engineer");
/// ```
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Computes the fingerprint of a title/URL pair
///
/// The fingerprint is the lowercase hex SHA-256 digest of
/// `normalize_title(title) + "|" + url.trim()`. It is deterministic across
/// runs and platforms and is the key used by fingerprint stores.
pub fn fingerprint(title: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_title(title).as_bytes());
    hasher.update(b"|");
    hasher.update(url.trim().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_collapses_whitespace() {
        assert_eq!(normalize_title("Data\n  Scientist"), "data scientist");
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn test_fingerprint_ignores_title_case_and_spacing() {
        let a = fingerprint("Software Engineer", "https://example.com/j/1");
        let b = fingerprint("  software   ENGINEER ", " https://example.com/j/1 ");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_urls() {
        let a = fingerprint("Engineer", "https://example.com/j/1");
        let b = fingerprint("Engineer", "https://example.com/j/2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_does_not_mutate_title() {
        let item = ListingItem::new("  Sales MANAGER ", "https://example.com/j/3");
        let _ = item.fingerprint();
        assert_eq!(item.title, "  Sales MANAGER ");
    }

    #[test]
    fn test_fingerprint_is_stable() {
        // Known value: stores keyed on this must survive upgrades
        let expected = {
            let mut hasher = Sha256::new();
            hasher.update(b"engineer|https://example.com/j/1");
            hex::encode(hasher.finalize())
        };
        assert_eq!(fingerprint("Engineer", "https://example.com/j/1"), expected);
    }
}
