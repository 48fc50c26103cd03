//! Storage module for remembering listing items across runs
//!
//! This module handles:
//! - SQLite database initialization and schema management
//! - An in-memory store for tests and one-off runs
//! - Filtering crawl output down to items not seen before

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryFingerprintStore;
pub use sqlite::SqliteFingerprintStore;
pub use traits::{FingerprintStore, StorageError, StorageResult};

use crate::listing::ListingItem;
use std::path::Path;

/// Opens or creates a fingerprint database
pub fn open_store(path: &Path) -> StorageResult<SqliteFingerprintStore> {
    SqliteFingerprintStore::new(path)
}

/// Returns the items `store` has not seen before, in their original order
///
/// Every returned item is remembered, so a second call with the same items
/// returns nothing.
pub fn retain_unseen<S>(items: &[ListingItem], store: &mut S) -> StorageResult<Vec<ListingItem>>
where
    S: FingerprintStore + ?Sized,
{
    let mut fresh = Vec::new();
    for item in items {
        if store.remember(item)? {
            fresh.push(item.clone());
        }
    }
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ListingItem> {
        vec![
            ListingItem::new("Engineer", "https://example.com/jobs/1"),
            ListingItem::new("Designer", "https://example.com/jobs/2"),
            ListingItem::new("Manager", "https://example.com/jobs/3"),
        ]
    }

    #[test]
    fn test_retain_unseen_first_run_returns_all() {
        let mut store = MemoryFingerprintStore::new();
        let fresh = retain_unseen(&items(), &mut store).unwrap();
        assert_eq!(fresh, items());
    }

    #[test]
    fn test_retain_unseen_skips_known_items() {
        let mut store = SqliteFingerprintStore::new_in_memory().unwrap();
        store.remember(&items()[1]).unwrap();

        let fresh = retain_unseen(&items(), &mut store).unwrap();
        let titles: Vec<_> = fresh.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Engineer", "Manager"]);

        assert!(retain_unseen(&items(), &mut store).unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_retain_unseen_through_trait_object() {
        let mut store: Box<dyn FingerprintStore> = Box::new(MemoryFingerprintStore::new());
        let fresh = retain_unseen(&items()[..1], store.as_mut()).unwrap();
        assert_eq!(fresh.len(), 1);
    }
}
