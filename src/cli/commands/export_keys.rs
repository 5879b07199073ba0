//! `ownervault export-keys` — list secret names for backup tooling.
//!
//! Never prints values: the JSON form is the contract handed to backup
//! and export jobs.

use crate::cli::output;
use crate::cli::{open_vault, require_owner, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::export_key_list;

/// Execute the `export-keys` command.
pub fn execute(cli: &Cli, format: &str) -> Result<()> {
    let owner = require_owner(cli)?;
    let vault = open_vault(cli)?;
    let export = export_key_list(&vault, &owner)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&export)
                .map_err(|e| VaultError::SerializationError(format!("JSON export: {e}")))?;
            println!("{json}");
        }
        "table" => {
            output::info(&format!("{} secret name(s)", export.count));
            output::print_keys_table(&export.keys);
        }
        other => {
            return Err(VaultError::CommandFailed(format!(
                "unknown export format '{other}' — use 'table' or 'json'"
            )));
        }
    }

    Ok(())
}
