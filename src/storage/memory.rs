//! In-memory fingerprint store, for tests and `--fresh` runs

use crate::listing::ListingItem;
use crate::storage::traits::{FingerprintStore, StorageResult};
use std::collections::HashMap;

/// Fingerprint store that forgets everything when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryFingerprintStore {
    seen: HashMap<String, ListingItem>,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn contains(&self, fingerprint: &str) -> StorageResult<bool> {
        Ok(self.seen.contains_key(fingerprint))
    }

    fn remember(&mut self, item: &ListingItem) -> StorageResult<bool> {
        let fingerprint = item.fingerprint();
        if self.seen.contains_key(&fingerprint) {
            return Ok(false);
        }
        self.seen.insert(fingerprint, item.clone());
        Ok(true)
    }

    fn count(&self) -> StorageResult<u64> {
        Ok(self.seen.len() as u64)
    }
}
