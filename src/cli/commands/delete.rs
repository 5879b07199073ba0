//! `ownervault delete` — remove a secret.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{audit, open_vault, require_owner, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, key: &str, force: bool) -> Result<()> {
    let owner = require_owner(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{key}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let vault = open_vault(cli)?;
    if vault.delete(key, &owner)? {
        audit(cli, "delete", Some(key), None);
        output::success(&format!("Deleted secret '{key}'"));
    } else {
        output::info(&format!("No secret named '{key}' — nothing to delete."));
    }

    Ok(())
}
