use serde::{Deserialize, Serialize};

/// Pagination signal reported for one fetched page
///
/// `total_pages` is best-effort and may be inaccurate. Traversal is driven by
/// `has_next` and `next_url` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Page number of the page just extracted (1-based)
    pub current_page: u32,

    /// Total number of pages, 1 when unknown
    pub total_pages: u32,

    /// URL of the next page, possibly relative to the current page
    pub next_url: Option<String>,

    /// Whether traversal should continue
    pub has_next: bool,
}

impl PaginationState {
    /// Signal for a page with no pagination at all
    pub fn single_page() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            next_url: None,
            has_next: false,
        }
    }

    /// Signal for page `current_page` of `total_pages` pointing at `next_url`
    pub fn with_next(current_page: u32, total_pages: u32, next_url: impl Into<String>) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages: total_pages.max(1),
            next_url: Some(next_url.into()),
            has_next: true,
        }
    }

    /// Signal for the last page of a listing
    pub fn last(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages: total_pages.max(1),
            next_url: None,
            has_next: false,
        }
    }

    /// The next URL, if present and non-blank
    pub fn next_url(&self) -> Option<&str> {
        self.next_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true if the signal claims a next page but gives no URL for it
    pub fn is_malformed(&self) -> bool {
        self.has_next && self.next_url().is_none()
    }

    /// Applies the fail-safe rule in place
    ///
    /// `has_next` without a usable `next_url` is downgraded to
    /// `has_next = false`. Returns true if a correction was made.
    pub fn enforce_next_url(&mut self) -> bool {
        if self.is_malformed() {
            self.has_next = false;
            true
        } else {
            false
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::single_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_next_url_is_corrected() {
        let mut state = PaginationState {
            current_page: 1,
            total_pages: 4,
            next_url: None,
            has_next: true,
        };
        assert!(state.enforce_next_url());
        assert!(!state.has_next);
        assert!(!state.enforce_next_url());
    }

    #[test]
    fn test_blank_next_url_is_corrected() {
        let mut state = PaginationState::with_next(1, 2, "   ");
        assert!(state.is_malformed());
        assert!(state.enforce_next_url());
        assert!(!state.has_next);
    }

    #[test]
    fn test_contradictory_totals_are_left_alone() {
        // current >= total but has_next: trusted literally
        let mut state = PaginationState::with_next(3, 3, "?page=4");
        assert!(!state.enforce_next_url());
        assert!(state.has_next);
        assert_eq!(state.next_url(), Some("?page=4"));
    }

    #[test]
    fn test_constructors_clamp_to_one() {
        let state = PaginationState::last(0, 0);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 1);
    }
}
