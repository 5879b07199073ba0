//! Styled terminal messages.
//!
//! Errors and warnings go to stderr so that rendered templates and secret
//! values on stdout can be piped safely.

use comfy_table::{ContentArrangement, Table};
use console::style;

pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Dimmed follow-up hint.
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Numbered table of secret names with the placeholder to use for each.
pub fn print_keys_table(keys: &[String]) {
    if keys.is_empty() {
        info("No secrets stored for this owner yet.");
        tip("Run `ownervault set <KEY>` to add your first secret.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Placeholder"]);

    for (i, key) in keys.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            key.clone(),
            crate::vault::placeholder::token(key),
        ]);
    }

    println!("{table}");
}
