//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod env_parser;
pub mod gitignore;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{SecretVault, SqliteStore};

/// OwnerVault CLI: per-owner encrypted secrets with template substitution.
#[derive(Parser)]
#[command(
    name = "ownervault",
    about = "Per-owner encrypted secret vault with ${NAME} template substitution",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Owner the secrets belong to
    #[arg(short, long, env = "OWNERVAULT_OWNER", global = true, hide_env_values = true)]
    pub owner: Option<String>,

    /// Vault directory (overrides `vault_dir` in .ownervault.toml)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a secret (add or replace)
    Set {
        /// Secret name (sanitized, e.g. db-pass -> DB_PASS)
        key: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Print a secret's value
    Get {
        /// Canonical secret name
        key: String,
    },

    /// List secret names
    List,

    /// Delete a secret
    Delete {
        /// Canonical secret name
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show the canonical form of a secret name
    Sanitize {
        /// Raw secret name
        key: String,
    },

    /// Render a template, replacing ${NAME} with secret values
    Inject {
        /// Template file
        file: String,
        /// Output file path (prints to stdout if omitted)
        #[arg(short = 'O', long)]
        output: Option<String>,
    },

    /// Replace literal secret values in a file with ${NAME} tokens
    Templatize {
        /// File containing raw secret values
        file: String,
        /// Output file path (prints to stdout if omitted)
        #[arg(short = 'O', long)]
        output: Option<String>,
    },

    /// Check that every ${NAME} in a template has a stored secret
    Check {
        /// Template file
        file: String,
    },

    /// Import secrets from a .env or JSON file
    Import {
        /// Path to the file to import
        file: String,

        /// Import format: env (default) or json (auto-detected from extension)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Export secret names (never values)
    ExportKeys {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Generate a random secret value
    Generate {
        /// Length in characters
        #[arg(short, long, default_value = "32")]
        length: usize,
        /// Store the generated value under this name
        #[arg(long)]
        store: Option<String>,
    },

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and
/// the default is `warn`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "ownervault=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere; ignore.
    }
}

/// Load `.ownervault.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Settings with `--vault-dir` applied on top of `.ownervault.toml`.
fn effective_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings()?;
    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    Ok(settings)
}

/// Resolve the vault directory from CLI args and settings.
///
/// Example: `<cwd>/.ownervault`
pub fn vault_dir(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(effective_settings(cli)?.vault_dir_path(&cwd))
}

/// Resolve the owner: `--owner`, then `OWNERVAULT_OWNER`, then
/// `default_owner` from settings.
pub fn require_owner(cli: &Cli) -> Result<String> {
    if let Some(owner) = cli.owner.as_deref().filter(|o| !o.is_empty()) {
        return Ok(owner.to_string());
    }
    load_settings()?.default_owner.ok_or_else(|| {
        VaultError::CommandFailed(
            "no owner given — use --owner <ID> or set OWNERVAULT_OWNER".into(),
        )
    })
}

/// Open the SQLite-backed vault for this invocation.
///
/// On first use the vault directory is created and added to `.gitignore`.
pub fn open_vault(cli: &Cli) -> Result<SecretVault<SqliteStore>> {
    let cwd = std::env::current_dir()?;
    let settings = effective_settings(cli)?;

    let first_use = !settings.vault_dir_path(&cwd).exists();
    let store = SqliteStore::open(&settings.database_path(&cwd))?;

    if first_use {
        let entry = format!("{}/", settings.vault_dir.trim_end_matches('/'));
        match gitignore::ensure_ignored(&cwd, &entry) {
            Ok(true) => info!(entry = %entry, "Added vault directory to .gitignore"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not update .gitignore"),
        }
    }

    SecretVault::new(store, settings.crypto_config())
}

/// Read a template or config file; `-` reads stdin.
pub fn read_source(path: &str) -> Result<String> {
    use std::io::Read;

    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .map_err(|e| VaultError::CommandFailed(format!("failed to read '{path}': {e}")))
}

/// Write rendered text to `dest`, or to stdout when `dest` is `None`.
///
/// Files are written owner-only on Unix since they may hold secrets.
pub fn write_result(dest: Option<&str>, content: &str) -> Result<()> {
    let Some(dest) = dest else {
        print!("{content}");
        return Ok(());
    };

    std::fs::write(dest, content)
        .map_err(|e| VaultError::CommandFailed(format!("failed to write '{dest}': {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Record an audit event for the invoking owner.
///
/// Best effort: a failure is logged at debug level and never fails the
/// command.  A no-op when the audit log is compiled out.
pub fn audit(cli: &Cli, op: &str, key: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    {
        let outcome = vault_dir(cli).and_then(|dir| {
            let owner = require_owner(cli)?;
            crate::audit::AuditLog::open(&dir)?.record(
                op,
                &crate::crypto::owner_fingerprint(&owner),
                key,
                details,
            )
        });
        if let Err(e) = outcome {
            tracing::debug!(operation = op, error = %e, "Audit event not recorded");
        }
    }

    #[cfg(not(feature = "audit-log"))]
    let _ = (cli, op, key, details);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn owner_flag_is_global() {
        let cli = parse(&["ownervault", "list", "--owner", "alice"]);
        assert_eq!(cli.owner.as_deref(), Some("alice"));
    }

    #[test]
    fn explicit_owner_wins() {
        let cli = parse(&["ownervault", "--owner", "bob", "list"]);
        assert_eq!(require_owner(&cli).unwrap(), "bob");
    }

    #[test]
    fn generate_defaults_to_32_chars() {
        let cli = parse(&["ownervault", "generate"]);
        match cli.command {
            Commands::Generate { length, store } => {
                assert_eq!(length, 32);
                assert!(store.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn set_accepts_optional_value() {
        let cli = parse(&["ownervault", "set", "db-pass"]);
        assert!(matches!(cli.command, Commands::Set { value: None, .. }));
    }
}
