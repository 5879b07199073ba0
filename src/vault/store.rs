//! Persistence seam for secret records.
//!
//! `SecretStore` is the only way the vault reaches storage.  Records are
//! addressed by `(owner, key)`; a missing record is `None`, not an error.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::errors::{Result, VaultError};

use super::record::SecretRecord;

/// Storage backend for encrypted secret records.
///
/// Implementations must make `upsert` atomic per `(owner, key)`:
/// concurrent writers race and the last write wins, with no merging.
pub trait SecretStore: Send + Sync {
    /// Insert the record, or fully replace the existing one for the same pair.
    fn upsert(&self, record: &SecretRecord) -> Result<()>;

    /// Fetch a record.  `Ok(None)` when nothing is stored under the pair.
    fn fetch(&self, owner: &str, key: &str) -> Result<Option<SecretRecord>>;

    /// Key names stored for `owner`, sorted by name.  Never values.
    fn list_keys(&self, owner: &str) -> Result<Vec<String>>;

    /// Remove a record.  Returns `true` if something was deleted;
    /// deleting an absent record is not an error.
    fn delete(&self, owner: &str, key: &str) -> Result<bool>;
}

/// In-process store backed by a sorted map.
///
/// Useful for tests and for embedding the vault without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<(String, String), SecretRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<(String, String), SecretRecord>>> {
        self.records
            .lock()
            .map_err(|_| VaultError::Store("memory store lock poisoned".into()))
    }
}

impl SecretStore for MemoryStore {
    fn upsert(&self, record: &SecretRecord) -> Result<()> {
        self.lock()?.insert(
            (record.owner.clone(), record.key.clone()),
            record.clone(),
        );
        Ok(())
    }

    fn fetch(&self, owner: &str, key: &str) -> Result<Option<SecretRecord>> {
        Ok(self
            .lock()?
            .get(&(owner.to_string(), key.to_string()))
            .cloned())
    }

    fn list_keys(&self, owner: &str) -> Result<Vec<String>> {
        // BTreeMap iterates in (owner, key) order, so keys come out sorted.
        Ok(self
            .lock()?
            .keys()
            .filter(|(o, _)| o == owner)
            .map(|(_, k)| k.clone())
            .collect())
    }

    fn delete(&self, owner: &str, key: &str) -> Result<bool> {
        Ok(self
            .lock()?
            .remove(&(owner.to_string(), key.to_string()))
            .is_some())
    }
}
