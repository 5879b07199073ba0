//! AES-256-GCM authenticated encryption with a 128-bit nonce.
//!
//! Each call to `encrypt` generates a fresh random 16-byte nonce.  The
//! ciphertext, nonce and auth tag come back as separate buffers because
//! the record stores them in separate columns.
//!
//! The caller passes associated data (see `associated_data`) which is
//! authenticated but not encrypted: a ciphertext only decrypts under the
//! same `(owner, key)` pair it was written for.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};

use super::kdf::RecordKey;
use crate::errors::{Result, VaultError};

/// AES-256-GCM instantiated with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Size of the nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of a single `encrypt` call.
#[derive(Debug, Clone)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
}

/// Build the associated data that binds a ciphertext to its record.
///
/// Layout: `[owner_len: u32 BE][owner][key]`.  The length prefix keeps
/// `("ab", "c")` and `("a", "bc")` distinct.
pub fn associated_data(owner: &str, key: &str) -> Vec<u8> {
    let owner_len = u32::try_from(owner.len()).unwrap_or(u32::MAX);
    let mut aad = Vec::with_capacity(4 + owner.len() + key.len());
    aad.extend_from_slice(&owner_len.to_be_bytes());
    aad.extend_from_slice(owner.as_bytes());
    aad.extend_from_slice(key.as_bytes());
    aad
}

/// Encrypt `plaintext` under `key`, authenticating `aad` alongside it.
pub fn encrypt(plaintext: &[u8], key: &RecordKey, aad: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm16::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm16::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, aad, &mut buffer)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Sealed {
        ciphertext: buffer,
        nonce: nonce.to_vec(),
        auth_tag: tag.to_vec(),
    })
}

/// Decrypt a buffer produced by `encrypt`.
///
/// Any failure (wrong key, wrong associated data, flipped bit, truncated
/// nonce or tag) is reported as `VaultError::Integrity`.
pub fn decrypt(
    ciphertext: &[u8],
    nonce: &[u8],
    auth_tag: &[u8],
    key: &RecordKey,
    aad: &[u8],
) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(VaultError::Integrity(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    if auth_tag.len() != TAG_LEN {
        return Err(VaultError::Integrity(format!(
            "auth tag must be {TAG_LEN} bytes, got {}",
            auth_tag.len()
        )));
    }

    let cipher = Aes256Gcm16::new_from_slice(key.as_bytes())
        .map_err(|_| VaultError::Integrity("invalid key length".into()))?;

    let nonce = Nonce::<U16>::from_slice(nonce);
    let tag = Tag::from_slice(auth_tag);

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(nonce, aad, &mut buffer, tag)
        .map_err(|_| VaultError::Integrity("authentication tag did not verify".into()))?;

    Ok(buffer)
}
