//! `.env` and JSON parsing for `ownervault import`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{Result, VaultError};

/// Split one `.env` line into `(key, value)`.
///
/// `None` for blank lines, `#` comments and lines without `=`.  An
/// optional `export ` prefix is dropped.  Quoted values keep everything
/// between the quotes; unquoted values end at a ` #` comment.
pub fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").map_or(line, str::trim_start);

    let (key, raw) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let raw = raw.trim();
    let value = match raw.chars().next() {
        Some(q @ ('"' | '\'')) => match raw[1..].find(q) {
            Some(end) => &raw[1..=end],
            None => raw,
        },
        _ => raw.find(" #").map_or(raw, |i| raw[..i].trim_end()),
    };

    Some((key, value))
}

/// Parse `.env` content into ordered `(key, value)` pairs.
///
/// Later duplicates are kept: the import stores them in order, so the
/// last assignment wins just as it would in a shell.
pub fn parse_env_str(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(parse_env_line)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parse a `.env` file into ordered `(key, value)` pairs.
pub fn parse_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)
        .map_err(|e| VaultError::CommandFailed(format!("failed to read file: {e}")))?;
    Ok(parse_env_str(&content))
}

/// Parse a JSON object with string values into ordered pairs.
///
/// Anything other than `{"KEY": "value", ...}` is rejected here, before
/// it reaches the vault.
pub fn parse_json_str(content: &str) -> Result<Vec<(String, String)>> {
    let map: BTreeMap<String, String> = serde_json::from_str(content).map_err(|e| {
        VaultError::SerializationError(format!("expected a JSON object of strings: {e}"))
    })?;
    Ok(map.into_iter().collect())
}

/// Parse a JSON file into ordered pairs.
pub fn parse_json_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)
        .map_err(|e| VaultError::CommandFailed(format!("failed to read file: {e}")))?;
    parse_json_str(&content)
}
