//! Audit trail of vault mutations.
//!
//! Each `set`, `delete`, `import`, `generate` and `templatize` appends a row
//! to `<vault_dir>/audit.db`.  Rows name the operation, the secret key and
//! the owner *fingerprint*; secret values and raw owner identifiers never
//! reach this table.
//!
//! Recording is best effort: a vault operation never fails because its
//! audit row could not be written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};

use crate::errors::{Result, VaultError};

const AUDIT_FILE: &str = "audit.db";

/// One row of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub operation: String,
    /// Owner fingerprint, see `owner_fingerprint`.
    pub owner: String,
    pub key: Option<String>,
    pub details: Option<String>,
}

/// Which rows `AuditLog::recent` returns.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Restrict to one owner fingerprint.
    pub owner: Option<String>,
    /// Only rows at or after this instant.
    pub since: Option<DateTime<Utc>>,
    pub limit: usize,
}

/// Append-only audit table beside the secrets database.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open or create `<vault_dir>/audit.db`.
    pub fn open(vault_dir: &Path) -> Result<Self> {
        let path = Self::path_in(vault_dir);
        let conn = Connection::open(&path)
            .map_err(|e| VaultError::AuditError(format!("open {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_events (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                at        TEXT NOT NULL,
                operation TEXT NOT NULL,
                owner_fp  TEXT NOT NULL,
                key       TEXT,
                details   TEXT
            );
            CREATE INDEX IF NOT EXISTS audit_events_owner ON audit_events(owner_fp, at);",
        )
        .map_err(|e| VaultError::AuditError(format!("schema: {e}")))?;

        Ok(Self { conn })
    }

    /// Location of the audit database inside a vault directory.
    pub fn path_in(vault_dir: &Path) -> PathBuf {
        vault_dir.join(AUDIT_FILE)
    }

    /// Append one event.
    pub fn record(
        &self,
        operation: &str,
        owner_fp: &str,
        key: Option<&str>,
        details: Option<&str>,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO audit_events (at, operation, owner_fp, key, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![Utc::now().to_rfc3339(), operation, owner_fp, key, details],
            )
            .map_err(|e| VaultError::AuditError(format!("insert: {e}")))?;
        Ok(())
    }

    /// Newest-first rows matching `filter`.
    pub fn recent(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
        let since = filter.since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, at, operation, owner_fp, key, details
                 FROM audit_events
                 WHERE (?1 IS NULL OR owner_fp = ?1)
                   AND (?2 IS NULL OR at >= ?2)
                 ORDER BY id DESC
                 LIMIT ?3",
            )
            .map_err(|e| VaultError::AuditError(format!("prepare: {e}")))?;

        let rows = stmt
            .query_map(params![filter.owner, since, limit], |row| {
                let at: String = row.get(1)?;
                let at = DateTime::parse_from_rfc3339(&at)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
                    })?
                    .with_timezone(&Utc);
                Ok(AuditEntry {
                    id: row.get(0)?,
                    at,
                    operation: row.get(2)?,
                    owner: row.get(3)?,
                    key: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| VaultError::AuditError(format!("query: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| VaultError::AuditError(format!("row: {e}")))
    }
}
