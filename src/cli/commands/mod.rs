//! One module per subcommand, each exposing `execute`.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod check;
pub mod delete;
pub mod export_keys;
pub mod generate;
pub mod get;
pub mod import_cmd;
pub mod inject;
pub mod list;
pub mod sanitize_cmd;
pub mod set;
pub mod templatize;
