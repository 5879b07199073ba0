//! The persisted secret record.
//!
//! Binary fields use custom serde helpers so they serialize as base64
//! strings in JSON rather than raw byte arrays.  The same encoding is
//! used for the SQLite columns.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// One encrypted secret, addressed by `(owner, key)`.
///
/// Holds no plaintext: the value only exists as `ciphertext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    /// The party the secret belongs to.
    pub owner: String,

    /// Canonical secret name (e.g. "DATABASE_URL").
    pub key: String,

    /// AES-256-GCM ciphertext, without nonce or tag.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    /// 16-byte random nonce used for this encryption.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    /// 16-byte GCM authentication tag.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub auth_tag: Vec<u8>,

    /// Salt fed to PBKDF2 to derive this record's key.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// When this record was last written.
    pub updated_at: DateTime<Utc>,
}

/// Encode a binary column for storage.
pub fn encode_field(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode a binary column read back from storage.
///
/// A column that is not valid base64 means the row was corrupted or
/// tampered with, so this is an integrity failure rather than "absent".
pub fn decode_field(column: &str, encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| VaultError::Integrity(format!("column '{column}' is not valid base64: {e}")))
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&encode_field(data))
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
