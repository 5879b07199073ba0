//! `ownervault templatize` — swap raw secret values for `${NAME}` tokens.
//!
//! Produces a shareable copy of a config file: every value the owner has
//! stored is replaced by its placeholder.

use crate::cli::output;
use crate::cli::{audit, open_vault, read_source, require_owner, write_result, Cli};
use crate::errors::Result;
use crate::vault::placeholder;

/// Execute the `templatize` command.
pub fn execute(cli: &Cli, file: &str, dest: Option<&str>) -> Result<()> {
    let owner = require_owner(cli)?;
    let content = read_source(file)?;
    let vault = open_vault(cli)?;

    let templated = placeholder::templatize_from_vault(&vault, &content, &owner)?;
    let tokens = placeholder::extract_tokens(&templated).len();

    write_result(dest, &templated)?;
    audit(
        cli,
        "templatize",
        None,
        Some(&format!("{tokens} placeholder(s) in {file}")),
    );

    if let Some(dest) = dest {
        output::success(&format!("Wrote template with {tokens} placeholder(s) to {dest}"));
    }
    Ok(())
}
