//! Random secret generation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Largest secret `generate_secret` will produce, in characters.
pub const MAX_SECRET_LEN: usize = 4096;

/// Return `length` printable characters drawn from a CSPRNG.
///
/// The alphabet is URL-safe base64 (`A-Z a-z 0-9 - _`), so the value can
/// sit in env files, URLs and compose templates without quoting.
pub fn generate_secret(length: usize) -> Result<String> {
    if length == 0 || length > MAX_SECRET_LEN {
        return Err(VaultError::Validation(format!(
            "secret length must be between 1 and {MAX_SECRET_LEN} (got {length})"
        )));
    }

    // Every 3 random bytes encode to 4 characters.
    let mut bytes = vec![0u8; (length * 3 + 3) / 4];
    rand::rng().fill_bytes(&mut bytes);

    let mut encoded = URL_SAFE_NO_PAD.encode(&bytes);
    bytes.zeroize();
    encoded.truncate(length);

    Ok(encoded)
}
