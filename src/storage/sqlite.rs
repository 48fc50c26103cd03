//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the
//! [`FingerprintStore`] trait.

use crate::listing::ListingItem;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{FingerprintStore, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Fingerprint store persisted in a SQLite file
pub struct SqliteFingerprintStore {
    conn: Connection,
}

impl SqliteFingerprintStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// When the item with `fingerprint` was first remembered (RFC 3339)
    pub fn first_seen_at(&self, fingerprint: &str) -> StorageResult<Option<String>> {
        let seen = self
            .conn
            .query_row(
                "SELECT first_seen_at FROM seen_listings WHERE fingerprint = ?1",
                params![fingerprint],
                |row| row.get(0),
            )
            .optional()?;
        Ok(seen)
    }
}

impl FingerprintStore for SqliteFingerprintStore {
    fn contains(&self, fingerprint: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM seen_listings WHERE fingerprint = ?1",
                params![fingerprint],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn remember(&mut self, item: &ListingItem) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO seen_listings (fingerprint, title, url, first_seen_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![item.fingerprint(), item.title, item.url, now],
        )?;
        Ok(inserted > 0)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM seen_listings", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(title: &str, url: &str) -> ListingItem {
        ListingItem::new(title, url)
    }

    #[test]
    fn test_remember_and_contains() {
        let mut store = SqliteFingerprintStore::new_in_memory().unwrap();
        let job = item("Rust Engineer", "https://example.com/jobs/1");

        assert!(!store.contains(&job.fingerprint()).unwrap());
        assert!(store.remember(&job).unwrap());
        assert!(store.contains(&job.fingerprint()).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_remember_twice_keeps_first_record() {
        let mut store = SqliteFingerprintStore::new_in_memory().unwrap();
        let job = item("Rust Engineer", "https://example.com/jobs/1");

        assert!(store.remember(&job).unwrap());
        let first_seen = store.first_seen_at(&job.fingerprint()).unwrap();

        // Same fingerprint, different casing and spacing
        assert!(!store
            .remember(&item("  rust   ENGINEER ", "https://example.com/jobs/1"))
            .unwrap());
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.first_seen_at(&job.fingerprint()).unwrap(), first_seen);
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.db");
        let job = item("Data Scientist", "https://example.com/jobs/2");

        {
            let mut store = SqliteFingerprintStore::new(&path).unwrap();
            store.remember(&job).unwrap();
        }

        let store = SqliteFingerprintStore::new(&path).unwrap();
        assert!(store.contains(&job.fingerprint()).unwrap());
        assert!(store.first_seen_at(&job.fingerprint()).unwrap().is_some());
    }
}
