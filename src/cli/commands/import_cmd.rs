//! `ownervault import` — load many secrets from a `.env` or JSON file.
//!
//! Best effort: every pair is sanitized and stored on its own, and pairs
//! that cannot be stored are listed and skipped.

use std::path::Path;
use std::str::FromStr;

use crate::cli::env_parser;
use crate::cli::output;
use crate::cli::{audit, open_vault, require_owner, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::bulk_import;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportFormat {
    Env,
    Json,
}

impl ImportFormat {
    /// `.json` files are JSON; anything else is read as `.env`.
    fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Env,
        }
    }

    fn parse_file(self, path: &Path) -> Result<Vec<(String, String)>> {
        match self {
            Self::Env => env_parser::parse_env_file(path),
            Self::Json => env_parser::parse_json_file(path),
        }
    }
}

impl FromStr for ImportFormat {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "env" | "dotenv" => Ok(Self::Env),
            "json" => Ok(Self::Json),
            other => Err(VaultError::CommandFailed(format!(
                "unknown import format '{other}', expected 'env' or 'json'"
            ))),
        }
    }
}

pub fn execute(cli: &Cli, file: &str, format: Option<&str>) -> Result<()> {
    let owner = require_owner(cli)?;
    let path = Path::new(file);
    if !path.is_file() {
        return Err(VaultError::CommandFailed(format!(
            "import file not found: {file}"
        )));
    }

    let format = match format {
        Some(name) => name.parse()?,
        None => ImportFormat::from_extension(path),
    };
    let pairs = format.parse_file(path)?;
    if pairs.is_empty() {
        output::warning(&format!("{file} contains no secrets"));
        return Ok(());
    }

    let vault = open_vault(cli)?;
    let report = bulk_import(&vault, pairs.iter().map(|(k, v)| (k, v)), &owner)?;

    for failed in &report.errors {
        output::warning(&format!("skipped {}: {}", failed.key, failed.message));
    }
    audit(
        cli,
        "import",
        None,
        Some(&format!(
            "{} of {} from {file}",
            report.imported,
            pairs.len()
        )),
    );

    output::success(&format!(
        "Imported {} of {} secrets from {file}",
        report.imported,
        pairs.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ImportFormat::from_extension(Path::new("s.json")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_extension(Path::new("S.JSON")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_extension(Path::new(".env")), ImportFormat::Env);
        assert_eq!(ImportFormat::from_extension(Path::new("prod.env")), ImportFormat::Env);
    }

    #[test]
    fn explicit_format_names() {
        assert_eq!("JSON".parse::<ImportFormat>().unwrap(), ImportFormat::Json);
        assert_eq!("dotenv".parse::<ImportFormat>().unwrap(), ImportFormat::Env);
        assert!("yaml".parse::<ImportFormat>().is_err());
    }
}
