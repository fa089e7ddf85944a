//! Settings model for the chatkeys shortcut engine.
//!
//! This crate provides the data types shared by the keybinding engine and
//! its callers, plus loading, saving and default values. It includes:
//!
//! - Key binding types with an explicit modifier intent
//! - Feature categories and their toggles
//! - The closed set of shortcut identifiers and per-user overrides
//! - Default bindings, including platform-conditional ones
//! - YAML persistence with legacy-override migration
//! - Settings file watching

pub mod config;
pub mod defaults;
pub mod error;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use config::{PartialSettings, Settings};
pub use error::ConfigError;
pub use types::{
    FeatureCategory, FeatureToggles, KeyBinding, ModifierIntent, Platform, ShortcutId,
    ShortcutSettings,
};
