use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::CryptoConfig;
use crate::errors::{Result, VaultError};

/// Lowest PBKDF2 iteration count accepted from a config file.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Project-level configuration, loaded from `.ownervault.toml`.
///
/// Every field has a sensible default so OwnerVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the database files.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the secrets database inside `vault_dir`.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// PBKDF2 iteration count (default: 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Owner used when neither `--owner` nor `OWNERVAULT_OWNER` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".ownervault".to_string()
}

fn default_database_file() -> String {
    "secrets.db".to_string()
}

fn default_kdf_iterations() -> u32 {
    crate::crypto::kdf::DEFAULT_ITERATIONS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            database_file: default_database_file(),
            kdf_iterations: default_kdf_iterations(),
            default_owner: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".ownervault.toml";

    /// Load settings from `<project_dir>/.ownervault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds unsafe values,
    /// an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would weaken the vault or cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.kdf_iterations < MIN_KDF_ITERATIONS {
            return Err(VaultError::ConfigError(format!(
                "kdf_iterations must be at least {MIN_KDF_ITERATIONS} (got {})",
                self.kdf_iterations
            )));
        }
        if self.database_file.is_empty() {
            return Err(VaultError::ConfigError(
                "database_file cannot be empty".into(),
            ));
        }
        if matches!(self.default_owner.as_deref(), Some("")) {
            return Err(VaultError::ConfigError(
                "default_owner cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Build the full path to the secrets database.
    ///
    /// Example: `project_dir/.ownervault/secrets.db`
    pub fn database_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(&self.database_file)
    }

    /// Directory holding the database and the audit log.
    pub fn vault_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn crypto_config(&self) -> CryptoConfig {
        CryptoConfig {
            kdf_iterations: self.kdf_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
