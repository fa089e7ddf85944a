//! Settings snapshot and merge logic.
//!
//! A [`Settings`] value is always complete: every toggle has a value and every
//! shortcut id has at least its default bindings. Saved files and partial
//! updates are [`PartialSettings`] that get merged over the defaults.

mod migration;
mod persistence;

use crate::defaults;
use crate::types::{FeatureCategory, FeatureToggles, Platform, ShortcutId, ShortcutSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete settings snapshot consumed by the shortcut engine.
///
/// The engine never edits a snapshot; an update replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub feature_toggles: FeatureToggles,
    #[serde(default)]
    pub shortcuts: ShortcutSettings,
}

/// Sparse settings as found in a saved file or an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSettings {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_toggles: BTreeMap<FeatureCategory, bool>,
    #[serde(skip_serializing_if = "ShortcutSettings::is_empty")]
    pub shortcuts: ShortcutSettings,
}

impl PartialSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partial update that changes a single toggle.
    pub fn toggle(category: FeatureCategory, enabled: bool) -> Self {
        let mut partial = Self::default();
        partial.feature_toggles.insert(category, enabled);
        partial
    }

    /// Partial update that replaces the bindings of a single shortcut.
    pub fn shortcut(id: ShortcutId, bindings: Vec<crate::KeyBinding>) -> Self {
        Self {
            feature_toggles: BTreeMap::new(),
            shortcuts: ShortcutSettings::new().with(id, bindings),
        }
    }
}

impl From<&Settings> for PartialSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            feature_toggles: FeatureCategory::ALL
                .into_iter()
                .map(|c| (c, settings.feature_toggles.is_enabled(c)))
                .collect(),
            shortcuts: settings.shortcuts.clone(),
        }
    }
}

impl Settings {
    /// Default settings for `platform`.
    pub fn defaults(platform: Platform) -> Self {
        defaults::settings(platform)
    }

    /// Merge saved values and then a partial update over the defaults.
    ///
    /// Later layers win per toggle and per shortcut id. Legacy overrides in
    /// `saved` are migrated unless `partial` replaces them.
    pub fn merge(saved: Option<&PartialSettings>, partial: &PartialSettings, platform: Platform) -> Self {
        let mut settings = Self::defaults(platform);

        let layers = saved.into_iter().chain(std::iter::once(partial));
        for layer in layers {
            for (category, enabled) in &layer.feature_toggles {
                settings.feature_toggles.set(*category, *enabled);
            }
            settings.shortcuts.extend_from(&layer.shortcuts);
        }

        if let Some(saved) = saved {
            migration::apply(&mut settings, saved, partial, platform);
        }

        settings
    }

    /// This snapshot with a partial update merged on top.
    pub fn merged_with(&self, partial: &PartialSettings, platform: Platform) -> Self {
        Self::merge(Some(&PartialSettings::from(self)), partial, platform)
    }
}
