//! Shortcut identifiers and user binding overrides.

use super::feature::FeatureCategory;
use super::keybinding::KeyBinding;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Logical shortcut action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShortcutId {
    ScrollTop,
    ScrollBottom,
    ScrollUp,
    ScrollDown,
    ScrollHalfUp,
    ScrollHalfDown,
    ToggleFocus,
    ToggleModel,
    ModeInstant,
    ModeThinking,
    ModePro,
    TemporaryChat,
    ToggleShortcuts,
    DeleteChat,
    UploadFiles,
    PinChat,
}

impl ShortcutId {
    /// Every id, in catalog order.
    pub const ALL: [ShortcutId; 16] = [
        ShortcutId::ScrollTop,
        ShortcutId::ScrollBottom,
        ShortcutId::ScrollUp,
        ShortcutId::ScrollDown,
        ShortcutId::ScrollHalfUp,
        ShortcutId::ScrollHalfDown,
        ShortcutId::ToggleFocus,
        ShortcutId::ToggleModel,
        ShortcutId::ModeInstant,
        ShortcutId::ModeThinking,
        ShortcutId::ModePro,
        ShortcutId::TemporaryChat,
        ShortcutId::ToggleShortcuts,
        ShortcutId::DeleteChat,
        ShortcutId::UploadFiles,
        ShortcutId::PinChat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShortcutId::ScrollTop => "scrollTop",
            ShortcutId::ScrollBottom => "scrollBottom",
            ShortcutId::ScrollUp => "scrollUp",
            ShortcutId::ScrollDown => "scrollDown",
            ShortcutId::ScrollHalfUp => "scrollHalfUp",
            ShortcutId::ScrollHalfDown => "scrollHalfDown",
            ShortcutId::ToggleFocus => "toggleFocus",
            ShortcutId::ToggleModel => "toggleModel",
            ShortcutId::ModeInstant => "modeInstant",
            ShortcutId::ModeThinking => "modeThinking",
            ShortcutId::ModePro => "modePro",
            ShortcutId::TemporaryChat => "temporaryChat",
            ShortcutId::ToggleShortcuts => "toggleShortcuts",
            ShortcutId::DeleteChat => "deleteChat",
            ShortcutId::UploadFiles => "uploadFiles",
            ShortcutId::PinChat => "pinChat",
        }
    }

    /// The feature category that gates this shortcut.
    pub fn category(self) -> FeatureCategory {
        match self {
            ShortcutId::ScrollTop
            | ShortcutId::ScrollBottom
            | ShortcutId::ScrollUp
            | ShortcutId::ScrollDown
            | ShortcutId::ScrollHalfUp
            | ShortcutId::ScrollHalfDown => FeatureCategory::VimScroll,
            ShortcutId::ToggleFocus => FeatureCategory::WideScreen,
            _ => FeatureCategory::OtherShortcuts,
        }
    }
}

impl fmt::Display for ShortcutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShortcutId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ShortcutId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownValue {
                kind: "shortcut id",
                value: s.to_string(),
            })
    }
}

/// User binding overrides keyed by shortcut id.
///
/// An id that is absent, or present with an empty list, uses the registry
/// defaults. Unknown ids in a settings file are dropped with a warning so a
/// retired shortcut never breaks loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<KeyBinding>>",
    into = "BTreeMap<String, Vec<KeyBinding>>"
)]
pub struct ShortcutSettings {
    overrides: BTreeMap<ShortcutId, Vec<KeyBinding>>,
}

impl ShortcutSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored list for `id`, including an explicitly empty one.
    pub fn get(&self, id: ShortcutId) -> Option<&[KeyBinding]> {
        self.overrides.get(&id).map(Vec::as_slice)
    }

    /// The stored list for `id` only when it is non-empty.
    pub fn override_for(&self, id: ShortcutId) -> Option<&[KeyBinding]> {
        self.get(id).filter(|bindings| !bindings.is_empty())
    }

    pub fn contains(&self, id: ShortcutId) -> bool {
        self.overrides.contains_key(&id)
    }

    pub fn set(&mut self, id: ShortcutId, bindings: Vec<KeyBinding>) {
        self.overrides.insert(id, bindings);
    }

    /// Copy of these settings with `id` replaced.
    pub fn with(mut self, id: ShortcutId, bindings: Vec<KeyBinding>) -> Self {
        self.set(id, bindings);
        self
    }

    pub fn remove(&mut self, id: ShortcutId) -> Option<Vec<KeyBinding>> {
        self.overrides.remove(&id)
    }

    /// Overwrite entries with every entry present in `other`.
    pub fn extend_from(&mut self, other: &ShortcutSettings) {
        for (id, bindings) in &other.overrides {
            self.overrides.insert(*id, bindings.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShortcutId, &[KeyBinding])> {
        self.overrides
            .iter()
            .map(|(id, bindings)| (*id, bindings.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl From<BTreeMap<String, Vec<KeyBinding>>> for ShortcutSettings {
    fn from(raw: BTreeMap<String, Vec<KeyBinding>>) -> Self {
        let mut overrides = BTreeMap::new();
        for (name, bindings) in raw {
            match name.parse::<ShortcutId>() {
                Ok(id) => {
                    overrides.insert(id, bindings);
                }
                Err(e) => log::warn!("Ignoring shortcut override: {}", e),
            }
        }
        Self { overrides }
    }
}

impl From<ShortcutSettings> for BTreeMap<String, Vec<KeyBinding>> {
    fn from(settings: ShortcutSettings) -> Self {
        settings
            .overrides
            .into_iter()
            .map(|(id, bindings)| (id.as_str().to_string(), bindings))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trips_through_str() {
        for id in ShortcutId::ALL {
            assert_eq!(id.as_str().parse::<ShortcutId>().unwrap(), id);
        }
        assert!("scrollSideways".parse::<ShortcutId>().is_err());
    }

    #[test]
    fn test_categories() {
        assert_eq!(ShortcutId::ScrollHalfDown.category(), FeatureCategory::VimScroll);
        assert_eq!(ShortcutId::ToggleFocus.category(), FeatureCategory::WideScreen);
        assert_eq!(ShortcutId::PinChat.category(), FeatureCategory::OtherShortcuts);
        assert_eq!(
            ShortcutId::ToggleShortcuts.category(),
            FeatureCategory::OtherShortcuts
        );
    }

    #[test]
    fn test_empty_override_is_stored_but_not_effective() {
        let settings = ShortcutSettings::new().with(ShortcutId::PinChat, Vec::new());
        assert!(settings.contains(ShortcutId::PinChat));
        assert_eq!(settings.get(ShortcutId::PinChat), Some(&[][..]));
        assert!(settings.override_for(ShortcutId::PinChat).is_none());
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let yaml = "scrollUp:\n  - key: w\nlegacyThing:\n  - key: x\n";
        let settings: ShortcutSettings = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get(ShortcutId::ScrollUp).unwrap()[0].key(), "w");
    }

    #[test]
    fn test_extend_from_overwrites() {
        let mut base = ShortcutSettings::new().with(ShortcutId::ScrollUp, vec![KeyBinding::new("k")]);
        let other = ShortcutSettings::new().with(ShortcutId::ScrollUp, vec![KeyBinding::new("w")]);
        base.extend_from(&other);
        assert_eq!(base.get(ShortcutId::ScrollUp).unwrap()[0].key(), "w");
    }
}
