//! `ownervault list` — display the owner's secret names in a table.

use crate::cli::output;
use crate::cli::{open_vault, require_owner, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let owner = require_owner(cli)?;
    let vault = open_vault(cli)?;

    let keys = vault.list_secret_keys(&owner)?;

    output::info(&format!("{} secret(s)", keys.len()));
    output::print_keys_table(&keys);

    Ok(())
}
