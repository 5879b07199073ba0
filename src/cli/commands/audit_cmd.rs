//! `ownervault audit` — show recent vault mutations for the current owner.
//!
//!   ownervault audit               # last 50 events
//!   ownervault audit --last 20
//!   ownervault audit --since 7d    # d, h or m

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditFilter, AuditLog};
use crate::cli::{output, require_owner, vault_dir, Cli};
use crate::crypto::owner_fingerprint;
use crate::errors::{Result, VaultError};

pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let owner = require_owner(cli)?;
    let dir = vault_dir(cli)?;

    if !AuditLog::path_in(&dir).exists() {
        output::info("No audit events recorded yet.");
        return Ok(());
    }

    let filter = AuditFilter {
        owner: Some(owner_fingerprint(&owner)),
        since: since.map(cutoff).transpose()?,
        limit: last,
    };
    let entries = AuditLog::open(&dir)?.recent(&filter)?;

    if entries.is_empty() {
        output::info("No matching audit events.");
    } else {
        render(&entries);
    }
    Ok(())
}

/// Turn `7d` / `24h` / `30m` into the instant that long ago.
fn cutoff(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}', expected e.g. 7d, 24h or 30m"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let span = match unit {
        'd' => Duration::try_days(amount),
        'h' => Duration::try_hours(amount),
        'm' => Duration::try_minutes(amount),
        _ => None,
    };
    span.and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(invalid)
}

fn render(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When (UTC)", "Operation", "Key", "Details"]);

    for entry in entries {
        let op = match entry.operation.as_str() {
            "delete" => style(&entry.operation).red(),
            "set" | "generate" => style(&entry.operation).green(),
            _ => style(&entry.operation).cyan(),
        };
        table.add_row(vec![
            entry.at.format("%Y-%m-%d %H:%M:%S").to_string(),
            op.to_string(),
            entry.key.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("{table}");
}
