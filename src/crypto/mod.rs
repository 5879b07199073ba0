//! Cryptographic primitives for OwnerVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 per-record key derivation (`kdf`)
//! - AES-256-GCM encryption with detached nonce and tag (`encryption`)
//! - Random secret minting (`random`)

pub mod encryption;
pub mod kdf;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive, ...};
pub use encryption::{associated_data, decrypt, encrypt, Sealed};
pub use kdf::{derive, generate_salt, CryptoConfig, RecordKey};
pub use random::generate_secret;

use sha2::{Digest, Sha256};

/// Short, non-reversible tag for an owner identifier.
///
/// The owner identifier is key material, so logs and the audit trail
/// carry this fingerprint instead: hex of the first 8 bytes of SHA-256.
pub fn owner_fingerprint(owner: &str) -> String {
    use std::fmt::Write;
    let digest = Sha256::digest(owner.as_bytes());
    let mut out = String::with_capacity(16);
    for byte in &digest[..8] {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
