//! `ownervault sanitize` — print the canonical form of a secret name.

use crate::cli::Cli;
use crate::errors::{Result, VaultError};
use crate::vault::sanitize;

/// Execute the `sanitize` command.
pub fn execute(_cli: &Cli, key: &str) -> Result<()> {
    let canonical = sanitize(key);
    if canonical.is_empty() {
        return Err(VaultError::Validation(format!(
            "'{key}' has no usable characters"
        )));
    }
    println!("{canonical}");
    Ok(())
}
