use thiserror::Error;

/// All errors that can occur in OwnerVault.
///
/// A missing secret is not an error: lookups return `Option::None`.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Integrity check failed — {0}")]
    Integrity(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Input errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Secret '{0}' is referenced by the template but not stored")]
    MissingSecret(String),

    // --- Store errors ---
    #[error("Secret store error: {0}")]
    Store(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl From<rusqlite::Error> for VaultError {
    fn from(e: rusqlite::Error) -> Self {
        VaultError::Store(e.to_string())
    }
}

/// Convenience type alias for OwnerVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
