//! High-level single-secret operations.
//!
//! `SecretVault` wraps a `SecretStore` and the crypto layer so that the
//! rest of the application can work with simple calls like
//! `vault.store("db-pass", "s3cret", owner)`.  The placeholder engine and
//! the batch helpers are built on top of these methods and never touch
//! the store directly.

use chrono::Utc;
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::crypto::{
    associated_data, decrypt, derive, encrypt, generate_salt, owner_fingerprint, CryptoConfig,
};
use crate::errors::{Result, VaultError};

use super::record::SecretRecord;
use super::sanitize::sanitize;
use super::store::SecretStore;

/// Longest secret name accepted on write.
const MAX_KEY_LEN: usize = 256;

/// The vault handle.  Cheap to share behind an `Arc`: it holds no
/// mutable state of its own.
pub struct SecretVault<S: SecretStore> {
    store: S,
    config: CryptoConfig,
}

impl<S: SecretStore> SecretVault<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build a vault over `store` with explicit crypto parameters.
    pub fn new(store: S, config: CryptoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Encrypt `value` and write it under the sanitized form of `key`.
    ///
    /// A fresh salt (and so a fresh record key) and a fresh nonce are
    /// generated on every call, including updates.  Returns the canonical
    /// key the value was stored under.
    pub fn store(&self, key: &str, value: &str, owner: &str) -> Result<String> {
        validate_owner(owner)?;
        if value.is_empty() {
            return Err(VaultError::Validation("secret value cannot be empty".into()));
        }

        // Sanitizing can lengthen a name ("SECRET_" prefix, 'ß' -> "SS"),
        // so the limit applies to the name that is actually stored.
        let canonical = sanitize(key);
        if canonical.is_empty() {
            return Err(VaultError::Validation(format!(
                "secret name '{key}' has no usable characters"
            )));
        }
        validate_key(&canonical)?;

        let salt = generate_salt();
        let record_key = derive(owner, &salt, &self.config)?;
        let sealed = encrypt(
            value.as_bytes(),
            &record_key,
            &associated_data(owner, &canonical),
        )?;
        drop(record_key);

        let record = SecretRecord {
            owner: owner.to_string(),
            key: canonical.clone(),
            ciphertext: sealed.ciphertext,
            nonce: sealed.nonce,
            auth_tag: sealed.auth_tag,
            salt: salt.to_vec(),
            updated_at: Utc::now(),
        };
        self.store.upsert(&record)?;

        debug!(
            owner = %owner_fingerprint(owner),
            key = %canonical,
            "Stored secret"
        );
        Ok(canonical)
    }

    /// Decrypt and return the value stored under `key`, if any.
    ///
    /// The key is looked up exactly as given.  A record that exists but
    /// fails to decrypt is an `Integrity` error, never `None`.
    pub fn retrieve(&self, key: &str, owner: &str) -> Result<Option<String>> {
        validate_owner(owner)?;
        validate_key(key)?;

        let Some(record) = self.store.fetch(owner, key)? else {
            return Ok(None);
        };

        if record.salt.is_empty() {
            return Err(VaultError::Integrity(format!("secret '{key}' has no salt")));
        }

        let record_key = derive(owner, &record.salt, &self.config)?;
        let plaintext = decrypt(
            &record.ciphertext,
            &record.nonce,
            &record.auth_tag,
            &record_key,
            &associated_data(owner, key),
        )
        .map_err(|e| {
            warn!(
                owner = %owner_fingerprint(owner),
                key = %key,
                error = %e,
                "Secret record failed integrity check"
            );
            VaultError::Integrity(format!("secret '{key}' could not be authenticated"))
        })?;

        // Convert via from_utf8 which takes ownership (no clone).
        // On error, zeroize the bytes inside the error before discarding.
        String::from_utf8(plaintext).map(Some).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::Integrity(format!("secret '{key}' is not valid UTF-8"))
        })
    }

    /// Returns `true` if a record exists for `key`.
    ///
    /// Metadata-only: the record is fetched but never decrypted.
    pub fn exists(&self, key: &str, owner: &str) -> Result<bool> {
        validate_owner(owner)?;
        validate_key(key)?;
        Ok(self.store.fetch(owner, key)?.is_some())
    }

    /// Names of all secrets `owner` has, sorted.  Never values.
    pub fn list_secret_keys(&self, owner: &str) -> Result<Vec<String>> {
        validate_owner(owner)?;
        self.store.list_keys(owner)
    }

    /// Permanently remove a secret.  Idempotent: returns `false` when
    /// nothing was stored under `key`.
    pub fn delete(&self, key: &str, owner: &str) -> Result<bool> {
        validate_owner(owner)?;
        validate_key(key)?;
        let removed = self.store.delete(owner, key)?;
        debug!(
            owner = %owner_fingerprint(owner),
            key = %key,
            removed,
            "Deleted secret"
        );
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The underlying record store.
    pub fn backend(&self) -> &S {
        &self.store
    }
}

fn validate_owner(owner: &str) -> Result<()> {
    if owner.is_empty() {
        return Err(VaultError::Validation("owner cannot be empty".into()));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(VaultError::Validation("secret name cannot be empty".into()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(VaultError::Validation(format!(
            "secret name cannot exceed {MAX_KEY_LEN} characters"
        )));
    }
    Ok(())
}
