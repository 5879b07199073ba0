//! Bulk operations built on the single-secret vault calls.
//!
//! Best-effort semantics: one failing item never aborts the batch, and
//! earlier successful writes are never rolled back.

use serde::Serialize;
use tracing::{info, warn};

use crate::crypto::owner_fingerprint;
use crate::errors::{Result, VaultError};

use super::service::SecretVault;
use super::store::SecretStore;

pub use crate::crypto::random::generate_secret;

/// Per-item failure recorded by `bulk_import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    /// The key as the caller supplied it (before sanitizing).
    pub key: String,
    pub message: String,
}

/// Outcome of `bulk_import`: a success count plus one entry per failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

impl ImportReport {
    /// Returns `true` if every pair was stored.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Key names for the backup/export collaborator.  Never carries values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyListExport {
    pub keys: Vec<String>,
    pub count: usize,
}

/// Sanitize and store each `(raw_key, value)` pair for `owner`.
///
/// An empty owner fails the whole call up front; everything else is
/// attributed to the pair that caused it.
pub fn bulk_import<S, I, K, V>(vault: &SecretVault<S>, pairs: I, owner: &str) -> Result<ImportReport>
where
    S: SecretStore,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    if owner.is_empty() {
        return Err(VaultError::Validation("owner cannot be empty".into()));
    }

    let mut report = ImportReport::default();
    for (key, value) in pairs {
        let key = key.as_ref();
        match vault.store(key, value.as_ref(), owner) {
            Ok(_) => report.imported += 1,
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping secret in bulk import");
                report.errors.push(ImportError {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        owner = %owner_fingerprint(owner),
        imported = report.imported,
        failed = report.errors.len(),
        "Bulk import finished"
    );
    Ok(report)
}

/// List `owner`'s key names with a count.
pub fn export_key_list<S: SecretStore>(vault: &SecretVault<S>, owner: &str) -> Result<KeyListExport> {
    let keys = vault.list_secret_keys(owner)?;
    Ok(KeyListExport {
        count: keys.len(),
        keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CryptoConfig;
    use crate::vault::store::MemoryStore;

    fn vault() -> SecretVault<MemoryStore> {
        SecretVault::new(MemoryStore::new(), CryptoConfig::with_iterations(1_000).unwrap())
            .unwrap()
    }

    #[test]
    fn report_completeness() {
        let v = vault();
        let report = bulk_import(&v, [("a", "1"), ("b", "2")], "alice").unwrap();
        assert!(report.is_complete());
        assert_eq!(report.imported, 2);
    }

    #[test]
    fn empty_owner_rejected_up_front() {
        let v = vault();
        assert!(bulk_import(&v, [("a", "1")], "").is_err());
    }

    #[test]
    fn export_key_list_counts_keys() {
        let v = vault();
        v.store("b", "2", "alice").unwrap();
        v.store("a", "1", "alice").unwrap();

        let export = export_key_list(&v, "alice").unwrap();
        assert_eq!(export.keys, vec!["A", "B"]);
        assert_eq!(export.count, 2);
    }

    #[test]
    fn export_serializes_without_values() {
        let v = vault();
        v.store("token", "very-secret-value", "alice").unwrap();
        let json = serde_json::to_string(&export_key_list(&v, "alice").unwrap()).unwrap();
        assert!(json.contains("TOKEN"));
        assert!(!json.contains("very-secret-value"));
    }
}
