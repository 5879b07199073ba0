//! `${NAME}` placeholder substitution.
//!
//! Configuration templates reference secrets by canonical name instead of
//! embedding them.  `inject` resolves the references for an owner,
//! `templatize` goes the other way for export, and `validate_exist`
//! reports which references are unresolved without decrypting anything.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

use crate::crypto::owner_fingerprint;
use crate::errors::{Result, VaultError};

use super::sanitize::is_token_name;
use super::service::SecretVault;
use super::store::SecretStore;

/// Matches `${NAME}`; group 1 is the name.
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Format `name` as a placeholder token.
pub fn token(name: &str) -> String {
    format!("${{{name}}}")
}

/// Unique placeholder names in `template`, in order of first appearance.
pub fn extract_tokens(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    token_regex()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Result of `validate_exist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistenceReport {
    pub all_present: bool,
    /// Every unresolved name, in order of first appearance.
    pub missing: Vec<String>,
}

/// Replace every `${NAME}` in `template` with the owner's secret value.
///
/// All-or-nothing: if any referenced secret is absent the call fails with
/// `MissingSecret` naming the first unresolved token and no text is
/// returned.  Everything outside the tokens is left byte-identical.
pub fn inject<S: SecretStore>(
    vault: &SecretVault<S>,
    template: &str,
    owner: &str,
) -> Result<String> {
    let names = extract_tokens(template);

    let mut resolved: HashMap<String, String> = HashMap::with_capacity(names.len());
    for name in names {
        match vault.retrieve(&name, owner)? {
            Some(value) => {
                resolved.insert(name, value);
            }
            None => return Err(VaultError::MissingSecret(name)),
        }
    }

    // One pass over the original text, so a value that happens to
    // contain "${OTHER}" is never substituted a second time.
    let rendered = token_regex()
        .replace_all(template, |caps: &Captures| {
            resolved
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    debug!(
        owner = %owner_fingerprint(owner),
        tokens = resolved.len(),
        "Injected secrets into template"
    );
    Ok(rendered)
}

/// Replace literal secret values in `content` with `${NAME}` tokens.
///
/// One pass over the original text: at each position the longest value
/// that matches wins (ties broken by name), and neither inserted tokens
/// nor `${NAME}` tokens already present in `content` are rewritten.
/// Empty values are skipped.  Every name must satisfy the placeholder
/// grammar.
pub fn templatize(
    content: &str,
    owner: &str,
    value_map: &BTreeMap<String, String>,
) -> Result<String> {
    if owner.is_empty() {
        return Err(VaultError::Validation("owner cannot be empty".into()));
    }
    if let Some(bad) = value_map.keys().find(|name| !is_token_name(name)) {
        return Err(VaultError::Validation(format!(
            "'{bad}' cannot be used as a placeholder name"
        )));
    }

    let mut candidates: Vec<(&str, &str)> = value_map
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    if candidates.is_empty() {
        return Ok(content.to_string());
    }
    candidates.sort_by(|(a_name, a_val), (b_name, b_val)| {
        b_val.len().cmp(&a_val.len()).then_with(|| a_name.cmp(b_name))
    });

    // Alternation is leftmost-first, so listing longer values first makes
    // every match the longest one starting at that position.
    let pattern = candidates
        .iter()
        .map(|(_, value)| regex::escape(value))
        .collect::<Vec<_>>()
        .join("|");
    let values = Regex::new(&pattern).map_err(|e| {
        VaultError::Validation(format!("secret values cannot be matched: {e}"))
    })?;

    let mut by_value: HashMap<&str, &str> = HashMap::with_capacity(candidates.len());
    for (name, value) in &candidates {
        by_value.entry(*value).or_insert(*name);
    }

    let mut out = String::with_capacity(content.len());
    let mut replaced = 0usize;
    let mut rest = 0;
    for existing in token_regex().find_iter(content) {
        replaced += replace_values(&content[rest..existing.start()], &values, &by_value, &mut out);
        out.push_str(existing.as_str());
        rest = existing.end();
    }
    replaced += replace_values(&content[rest..], &values, &by_value, &mut out);

    debug!(
        owner = %owner_fingerprint(owner),
        replaced,
        "Templatized content"
    );
    Ok(out)
}

/// Append `segment` to `out` with every value match swapped for its token.
fn replace_values(
    segment: &str,
    values: &Regex,
    by_value: &HashMap<&str, &str>,
    out: &mut String,
) -> usize {
    let mut count = 0;
    let mut last = 0;
    for m in values.find_iter(segment) {
        let Some(name) = by_value.get(m.as_str()) else {
            continue;
        };
        out.push_str(&segment[last..m.start()]);
        out.push_str(&token(name));
        last = m.end();
        count += 1;
    }
    out.push_str(&segment[last..]);
    count
}

/// `templatize` using the owner's own secrets as the value map.
///
/// Only secrets whose value occurs in `content` take part.  The decrypted
/// values stay inside this call.
pub fn templatize_from_vault<S: SecretStore>(
    vault: &SecretVault<S>,
    content: &str,
    owner: &str,
) -> Result<String> {
    let mut value_map = BTreeMap::new();
    for name in vault.list_secret_keys(owner)? {
        if let Some(value) = vault.retrieve(&name, owner)? {
            if !value.is_empty() && content.contains(value.as_str()) {
                value_map.insert(name, value);
            }
        }
    }
    templatize(content, owner, &value_map)
}

/// Report which placeholders in `template` have no stored secret.
///
/// Presence check only: records are fetched, never decrypted.  Unlike
/// `inject` this collects every missing name instead of stopping at the
/// first.
pub fn validate_exist<S: SecretStore>(
    vault: &SecretVault<S>,
    template: &str,
    owner: &str,
) -> Result<ExistenceReport> {
    let mut missing = Vec::new();
    for name in extract_tokens(template) {
        if !vault.exists(&name, owner)? {
            missing.push(name);
        }
    }

    Ok(ExistenceReport {
        all_present: missing.is_empty(),
        missing,
    })
}
