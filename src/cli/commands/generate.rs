//! `ownervault generate` — mint a random secret value.

use crate::cli::output;
use crate::cli::{audit, open_vault, require_owner, Cli};
use crate::errors::Result;
use crate::vault::generate_secret;

/// Execute the `generate` command.
///
/// Without `--store` the value is printed; with it the value is stored
/// and only its name is shown.
pub fn execute(cli: &Cli, length: usize, store_as: Option<&str>) -> Result<()> {
    let value = generate_secret(length)?;

    let Some(name) = store_as else {
        println!("{value}");
        return Ok(());
    };

    let owner = require_owner(cli)?;
    let vault = open_vault(cli)?;
    let stored_as = vault.store(name, &value, &owner)?;

    audit(cli, "generate", Some(&stored_as), Some(&format!("{length} chars")));
    output::success(&format!(
        "Generated a {length}-character secret and stored it as '{stored_as}'"
    ));

    Ok(())
}
