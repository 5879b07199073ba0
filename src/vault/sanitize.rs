//! Secret name normalization.
//!
//! Caller-supplied names like `"db-pass"` or `"9 api key"` are turned
//! into canonical identifiers (`DB_PASS`, `SECRET_9_API_KEY`) that can be
//! referenced from templates as `${NAME}`.

/// Prefix added when a sanitized name would start with a digit.
pub const DIGIT_PREFIX: &str = "SECRET_";

/// Normalize a raw secret name into canonical form.
///
/// Total function: never fails, but may return an empty string when the
/// input has nothing usable in it (e.g. `"!!!"`).  A non-empty result
/// always matches `^[A-Z][A-Z0-9_]*$`.
pub fn sanitize(raw: &str) -> String {
    // Upper-case, then map everything outside [A-Z0-9_] to '_'.
    let replaced: String = raw
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Collapse runs of '_'.
    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    // Strip leading/trailing '_'.
    let trimmed = collapsed.trim_matches('_');

    // The digit check runs after trimming so "_9" cannot end up as "9".
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{DIGIT_PREFIX}{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Returns `true` if `key` is already in canonical form.
pub fn is_canonical(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(is_key_char),
        _ => false,
    }
}

/// Returns `true` if `name` may appear inside a `${...}` placeholder.
///
/// Wider than `is_canonical`: a leading '_' is accepted so records
/// written before sanitization existed stay reachable.
pub fn is_token_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() || first == '_' => chars.all(is_key_char),
        _ => false,
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}
