//! Typed error variants for the chatkeys-config crate.
//!
//! `Settings::load_from` and `Settings::save_to` return `anyhow::Result`;
//! the underlying failures are `ConfigError` values so callers can downcast
//! and match on a specific failure mode instead of an opaque string.
//!
//! ```rust,no_run
//! use chatkeys_config::ConfigError;
//!
//! fn describe(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!             ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
//!             other => eprintln!("{other}"),
//!         }
//!     }
//! }
//! ```

use thiserror::Error;

/// Errors that can occur when loading, saving or interpreting settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the settings file.
    #[error("I/O error reading settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file contained YAML that could not be parsed.
    #[error("YAML parse error in settings: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A locale dictionary or other JSON input could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string did not name any known value of the given kind.
    #[error("unknown {kind}: '{value}'")]
    UnknownValue {
        /// What was being parsed, e.g. "shortcut id".
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
