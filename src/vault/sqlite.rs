//! SQLite-backed secret store.
//!
//! One row per `(owner, key)`.  Binary fields are stored as base64 text
//! and `updated_at` as RFC 3339, so the table stays readable with the
//! stock `sqlite3` shell.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{Result, VaultError};

use super::record::{decode_field, encode_field, SecretRecord};
use super::store::SecretStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS secrets (
    owner       TEXT NOT NULL,
    key         TEXT NOT NULL,
    ciphertext  TEXT NOT NULL,
    nonce       TEXT NOT NULL,
    auth_tag    TEXT NOT NULL,
    salt        TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    PRIMARY KEY (owner, key)
);";

/// Raw column values as read from a row, before decoding.
struct Row {
    owner: String,
    key: String,
    ciphertext: String,
    nonce: String,
    auth_tag: String,
    salt: String,
    updated_at: String,
}

/// `SecretStore` over a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    ///
    /// The parent directory is created if missing and the file is
    /// restricted to owner-only access on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Self::init(conn)
    }

    /// Open a private in-memory database (lost on drop).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Store("sqlite connection lock poisoned".into()))
    }

    /// Decode a raw row.  Any column that does not decode is an
    /// integrity failure: a corrupted row must never read as "absent".
    fn decode(row: Row) -> Result<SecretRecord> {
        let updated_at = DateTime::parse_from_rfc3339(&row.updated_at)
            .map_err(|e| {
                VaultError::Integrity(format!("column 'updated_at' is not RFC 3339: {e}"))
            })?
            .with_timezone(&Utc);

        Ok(SecretRecord {
            ciphertext: decode_field("ciphertext", &row.ciphertext)?,
            nonce: decode_field("nonce", &row.nonce)?,
            auth_tag: decode_field("auth_tag", &row.auth_tag)?,
            salt: decode_field("salt", &row.salt)?,
            owner: row.owner,
            key: row.key,
            updated_at,
        })
    }
}

impl SecretStore for SqliteStore {
    fn upsert(&self, record: &SecretRecord) -> Result<()> {
        // Single statement, so the replace is atomic per (owner, key).
        self.conn()?.execute(
            "INSERT INTO secrets (owner, key, ciphertext, nonce, auth_tag, salt, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(owner, key) DO UPDATE SET
                ciphertext = excluded.ciphertext,
                nonce      = excluded.nonce,
                auth_tag   = excluded.auth_tag,
                salt       = excluded.salt,
                updated_at = excluded.updated_at",
            params![
                record.owner,
                record.key,
                encode_field(&record.ciphertext),
                encode_field(&record.nonce),
                encode_field(&record.auth_tag),
                encode_field(&record.salt),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn fetch(&self, owner: &str, key: &str) -> Result<Option<SecretRecord>> {
        let row = self
            .conn()?
            .query_row(
                "SELECT owner, key, ciphertext, nonce, auth_tag, salt, updated_at
                 FROM secrets
                 WHERE owner = ?1 AND key = ?2",
                params![owner, key],
                |r| {
                    Ok(Row {
                        owner: r.get(0)?,
                        key: r.get(1)?,
                        ciphertext: r.get(2)?,
                        nonce: r.get(3)?,
                        auth_tag: r.get(4)?,
                        salt: r.get(5)?,
                        updated_at: r.get(6)?,
                    })
                },
            )
            .optional()?;

        row.map(Self::decode).transpose()
    }

    fn list_keys(&self, owner: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM secrets WHERE owner = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![owner], |r| r.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn delete(&self, owner: &str, key: &str) -> Result<bool> {
        let removed = self.conn()?.execute(
            "DELETE FROM secrets WHERE owner = ?1 AND key = ?2",
            params![owner, key],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(owner: &str, key: &str, ciphertext: &[u8]) -> SecretRecord {
        SecretRecord {
            owner: owner.into(),
            key: key.into(),
            ciphertext: ciphertext.to_vec(),
            nonce: vec![1; 16],
            auth_tag: vec![2; 16],
            salt: vec![3; 32],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_and_fetch_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let original = record("alice", "DB_PASS", b"cipher");
        store.upsert(&original).unwrap();

        let fetched = store.fetch("alice", "DB_PASS").unwrap().unwrap();
        assert_eq!(fetched.ciphertext, original.ciphertext);
        assert_eq!(fetched.nonce, original.nonce);
        assert_eq!(fetched.auth_tag, original.auth_tag);
        assert_eq!(fetched.salt, original.salt);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert(&record("alice", "K", b"v1")).unwrap();
        store.upsert(&record("alice", "K", b"v2")).unwrap();

        assert_eq!(store.list_keys("alice").unwrap(), vec!["K"]);
        assert_eq!(store.fetch("alice", "K").unwrap().unwrap().ciphertext, b"v2");
    }

    #[test]
    fn list_keys_sorted_and_scoped() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert(&record("alice", "ZED", b"z")).unwrap();
        store.upsert(&record("alice", "ABE", b"a")).unwrap();
        store.upsert(&record("bob", "BOB_ONLY", b"b")).unwrap();

        assert_eq!(store.list_keys("alice").unwrap(), vec!["ABE", "ZED"]);
    }

    #[test]
    fn delete_reports_whether_row_existed() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert(&record("alice", "K", b"v")).unwrap();
        assert!(store.delete("alice", "K").unwrap());
        assert!(!store.delete("alice", "K").unwrap());
        assert!(store.fetch("alice", "K").unwrap().is_none());
    }

    #[test]
    fn malformed_row_is_integrity_error_not_absent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert(&record("alice", "K", b"v")).unwrap();
        store
            .conn()
            .unwrap()
            .execute("UPDATE secrets SET nonce = '%%%' WHERE key = 'K'", [])
            .unwrap();

        let err = store.fetch("alice", "K").unwrap_err();
        assert!(matches!(err, VaultError::Integrity(_)));
    }

    #[test]
    fn file_database_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("secrets.db");

        SqliteStore::open(&path)
            .unwrap()
            .upsert(&record("alice", "K", b"v"))
            .unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.fetch("alice", "K").unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn database_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.db");
        let _store = SqliteStore::open(&path).unwrap();

        let perms = std::fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
