//! `ownervault check` — report unresolved placeholders in a template.

use crate::cli::output;
use crate::cli::{open_vault, read_source, require_owner, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::placeholder;

/// Execute the `check` command.  Fails if anything is missing.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let owner = require_owner(cli)?;
    let template = read_source(file)?;
    let vault = open_vault(cli)?;

    let report = placeholder::validate_exist(&vault, &template, &owner)?;
    if report.all_present {
        let count = placeholder::extract_tokens(&template).len();
        output::success(&format!("All {count} placeholder(s) in {file} resolve"));
        return Ok(());
    }

    for name in &report.missing {
        output::warning(&format!("missing: ${{{name}}}"));
    }
    Err(VaultError::CommandFailed(format!(
        "{} placeholder(s) in {file} have no stored secret",
        report.missing.len()
    )))
}
