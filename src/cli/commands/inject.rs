//! `ownervault inject` — render a template with secret values.

use crate::cli::output;
use crate::cli::{open_vault, read_source, require_owner, write_result, Cli};
use crate::errors::Result;
use crate::vault::placeholder;

/// Execute the `inject` command.
///
/// Nothing is written when any placeholder is unresolved.
pub fn execute(cli: &Cli, file: &str, dest: Option<&str>) -> Result<()> {
    let owner = require_owner(cli)?;
    let template = read_source(file)?;
    let vault = open_vault(cli)?;

    let rendered = placeholder::inject(&vault, &template, &owner)?;
    write_result(dest, &rendered)?;

    if let Some(dest) = dest {
        output::success(&format!("Rendered {file} into {dest}"));
    }
    Ok(())
}
