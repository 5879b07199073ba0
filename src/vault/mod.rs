//! Vault module — per-owner encrypted secret storage.
//!
//! This module provides:
//! - Key name normalization (`sanitize`)
//! - The persisted `SecretRecord` (`record`)
//! - The `SecretStore` seam with in-memory and SQLite backends (`store`, `sqlite`)
//! - `SecretVault` single-secret operations (`service`)
//! - `${NAME}` template substitution (`placeholder`)
//! - Bulk import and key export (`batch`)

pub mod batch;
pub mod placeholder;
pub mod record;
pub mod sanitize;
pub mod service;
pub mod sqlite;
pub mod store;

// Re-export the most commonly used items.
pub use batch::{bulk_import, export_key_list, generate_secret, ImportError, ImportReport, KeyListExport};
pub use placeholder::{
    extract_tokens, inject, templatize, templatize_from_vault, validate_exist, ExistenceReport,
};
pub use record::SecretRecord;
pub use sanitize::sanitize;
pub use service::SecretVault;
pub use sqlite::SqliteStore;
pub use store::{MemoryStore, SecretStore};
