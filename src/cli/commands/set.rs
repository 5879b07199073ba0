//! `ownervault set` — add or replace a secret.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{audit, open_vault, require_owner, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::sanitize;

/// Execute the `set` command.
pub fn execute(cli: &Cli, key: &str, value: Option<&str>) -> Result<()> {
    let owner = require_owner(cli)?;

    // Determine the secret value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        v.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).
        dialoguer::Password::new()
            .with_prompt(format!("Enter value for {}", sanitize(key)))
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?
    };

    let vault = open_vault(cli)?;
    let canonical = sanitize(key);
    let existed = !canonical.is_empty() && vault.exists(&canonical, &owner)?;
    let stored_as = vault.store(key, &secret_value, &owner)?;

    let op_detail = if existed { "updated" } else { "added" };
    audit(cli, "set", Some(&stored_as), Some(op_detail));

    if stored_as != key {
        output::info(&format!("'{key}' was stored as '{stored_as}'"));
    }
    output::success(&format!("Secret '{stored_as}' {op_detail}"));
    output::tip(&format!("Reference it in templates as ${{{stored_as}}}"));

    Ok(())
}
