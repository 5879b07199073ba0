//! Project configuration loaded from `.ownervault.toml`.

pub mod settings;

pub use settings::Settings;
