//! Settings file I/O.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - path helpers (`settings_dir`, `settings_path`, `locale_path`)
//! - `update`, which merges a partial change into the saved file

use super::{PartialSettings, Settings};
use crate::error::ConfigError;
use crate::types::Platform;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "chatkeys";
const SETTINGS_FILE: &str = "settings.yaml";
const LOCALE_FILE: &str = "messages.json";

impl Settings {
    /// Load settings from the default path, creating the file if missing.
    pub fn load(platform: Platform) -> Result<Self> {
        Self::load_from(&Self::settings_path(), platform)
    }

    /// Load settings from `path`, creating a default file there if missing.
    pub fn load_from(path: &Path, platform: Platform) -> Result<Self> {
        log::info!("Settings path: {:?}", path);

        if path.exists() {
            let saved = Self::read_partial(path)?;
            let settings = Self::merge(Some(&saved), &PartialSettings::new(), platform);
            log::info!(
                "Loaded settings with {} shortcut override(s)",
                saved.shortcuts.len()
            );
            Ok(settings)
        } else {
            log::info!("Settings file not found, creating default at {:?}", path);
            let settings = Self::defaults(platform);
            if let Err(e) = settings.save_to(path) {
                log::error!("Failed to save default settings: {}", e);
                return Err(e);
            }
            Ok(settings)
        }
    }

    /// Parse the sparse contents of a settings file.
    ///
    /// An empty file is treated as no saved values.
    pub fn read_partial(path: &Path) -> Result<PartialSettings> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        if contents.trim().is_empty() {
            return Ok(PartialSettings::new());
        }
        serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse settings file {:?}", path))
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    /// Save settings to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Write to a sibling temp file then rename so readers never see a torn file.
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        log::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Merge `partial` over the file at `path` and write the result back.
    ///
    /// A missing file is treated as empty.
    pub fn update(path: &Path, partial: &PartialSettings, platform: Platform) -> Result<Self> {
        let saved = if path.exists() {
            Some(Self::read_partial(path)?)
        } else {
            None
        };
        let settings = Self::merge(saved.as_ref(), partial, platform);
        settings.save_to(path)?;
        Ok(settings)
    }

    /// Directory holding the settings file.
    pub fn settings_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn settings_path() -> PathBuf {
        Self::settings_dir().join(SETTINGS_FILE)
    }

    /// Optional JSON file with translated UI messages.
    pub fn locale_path() -> PathBuf {
        Self::settings_dir().join(LOCALE_FILE)
    }
}
