// Library exports for the binary, integration tests and embedding hosts.
//
// The key binding model and settings live in the `chatkeys-config` and
// `chatkeys-keybindings` workspace crates and are re-exported here so callers
// only need one dependency.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod automation;
pub mod cli;
pub mod engine;
pub mod help;
pub mod i18n;

pub use chatkeys_config as config;
pub use chatkeys_keybindings as keybindings;
