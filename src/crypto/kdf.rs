//! Per-record key derivation using PBKDF2-HMAC-SHA256.
//!
//! The owner identifier is the password input and every record carries
//! its own random salt, so two records of the same owner never share an
//! encryption key.  There is no master key: the owner identifier is the
//! root secret material.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Crypto parameters handed to the vault at construction.
///
/// Production code should stay on the defaults; tests lower
/// `kdf_iterations` to keep the suite fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoConfig {
    /// Number of PBKDF2 rounds (default: 100 000).
    pub kdf_iterations: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl CryptoConfig {
    /// Build a config with an explicit iteration count.
    pub fn with_iterations(kdf_iterations: u32) -> Result<Self> {
        let config = Self { kdf_iterations };
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters PBKDF2 cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.kdf_iterations < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "PBKDF2 iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A 32-byte record key that zeroes its memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RecordKey {
    bytes: [u8; KEY_LEN],
}

impl RecordKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive the encryption key for one record from `owner` and `salt`.
///
/// Deterministic: the same owner, salt and config always produce the
/// same key.
pub fn derive(owner: &str, salt: &[u8], config: &CryptoConfig) -> Result<RecordKey> {
    config.validate()?;
    if owner.is_empty() {
        return Err(VaultError::KeyDerivationFailed(
            "owner identifier cannot be empty".into(),
        ));
    }
    if salt.is_empty() {
        return Err(VaultError::KeyDerivationFailed(
            "salt cannot be empty".into(),
        ));
    }

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(owner.as_bytes(), salt, config.kdf_iterations, &mut bytes);
    let key = RecordKey::new(bytes);
    bytes.zeroize();

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
