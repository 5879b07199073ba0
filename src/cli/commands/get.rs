//! `ownervault get` — retrieve and print a single secret's value.

use crate::cli::{open_vault, require_owner, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    let owner = require_owner(cli)?;
    let vault = open_vault(cli)?;

    // Decrypt and print the secret value to stdout.
    match vault.retrieve(key, &owner)? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Err(VaultError::CommandFailed(format!("secret '{key}' not found"))),
    }
}
