//! Shortcut catalog.
//!
//! The registry is the immutable list of shortcut definitions for one
//! platform. It resolves the bindings that are actually in effect for a
//! shortcut: the user override when present and non-empty, else the default.

use crate::matcher::bindings_equal;
use chatkeys_config::{
    FeatureCategory, KeyBinding, Platform, Settings, ShortcutId, ShortcutSettings, defaults,
};

/// Source of translated UI strings.
pub trait MessageLookup {
    /// The translated text for `key`, if one exists.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Lookup that never finds anything, so every label uses its fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMessages;

impl MessageLookup for NoMessages {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

/// One entry in the shortcut catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutDefinition {
    pub id: ShortcutId,
    /// Message id of the display label.
    pub label_key: &'static str,
    /// English label used when no translation is available.
    pub fallback_label: &'static str,
    pub category: FeatureCategory,
    pub defaults: Vec<KeyBinding>,
}

impl ShortcutDefinition {
    /// Localized label, falling back to the built-in English text.
    pub fn label(&self, messages: &dyn MessageLookup) -> String {
        messages
            .lookup(self.label_key)
            .unwrap_or_else(|| self.fallback_label.to_string())
    }
}

/// A chord the host application reserves for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDefaultShortcut {
    pub label_key: &'static str,
    pub fallback_label: &'static str,
    pub binding: KeyBinding,
}

impl HostDefaultShortcut {
    pub fn label(&self, messages: &dyn MessageLookup) -> String {
        messages
            .lookup(self.label_key)
            .unwrap_or_else(|| self.fallback_label.to_string())
    }
}

fn label_keys(id: ShortcutId) -> (&'static str, &'static str) {
    match id {
        ShortcutId::ScrollTop => ("shortcut_label_scroll_top", "Scroll to Top"),
        ShortcutId::ScrollBottom => ("shortcut_label_scroll_bottom", "Scroll to Bottom"),
        ShortcutId::ScrollUp => ("shortcut_label_scroll_up", "Scroll Up"),
        ShortcutId::ScrollDown => ("shortcut_label_scroll_down", "Scroll Down"),
        ShortcutId::ScrollHalfUp => ("shortcut_label_scroll_half_up", "Scroll Half Page Up"),
        ShortcutId::ScrollHalfDown => ("shortcut_label_scroll_half_down", "Scroll Half Page Down"),
        ShortcutId::ToggleFocus => ("shortcut_label_toggle_focus", "Toggle Focus"),
        ShortcutId::ToggleModel => ("shortcut_label_toggle_model", "Toggle Model Selector"),
        ShortcutId::ModeInstant => ("shortcut_label_mode_instant", "Set Mode: Fast"),
        ShortcutId::ModeThinking => ("shortcut_label_mode_thinking", "Set Mode: Thinking"),
        ShortcutId::ModePro => ("shortcut_label_mode_pro", "Set Mode: Pro"),
        ShortcutId::TemporaryChat => ("shortcut_label_temporary_chat", "Open Temporary Chat"),
        ShortcutId::ToggleShortcuts => ("shortcut_label_toggle_shortcuts", "Toggle Shortcuts List"),
        ShortcutId::DeleteChat => ("shortcut_label_delete_chat", "Delete Chat"),
        ShortcutId::UploadFiles => ("shortcut_label_upload_files", "Upload Files"),
        ShortcutId::PinChat => ("shortcut_label_pin_chat", "Pin Chat"),
    }
}

const HOST_LABELS: [(&str, &str); 3] = [
    ("host_default_shortcut_new_chat", "New chat"),
    ("host_default_shortcut_search", "Search"),
    ("host_default_shortcut_toggle_sidebar", "Toggle Side Bar"),
];

/// Message ids of every shortcut and host label, in catalog order.
///
/// The registry owns the English text for these ids; translations only
/// override it.
pub fn label_message_ids() -> impl Iterator<Item = &'static str> {
    ShortcutId::ALL
        .into_iter()
        .map(|id| label_keys(id).0)
        .chain(HOST_LABELS.into_iter().map(|(key, _)| key))
}

/// Immutable shortcut catalog for one platform.
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    platform: Platform,
    definitions: Vec<ShortcutDefinition>,
    host_defaults: Vec<HostDefaultShortcut>,
}

impl ShortcutRegistry {
    /// Build the catalog for `platform`.
    pub fn new(platform: Platform) -> Self {
        let definitions: Vec<ShortcutDefinition> = ShortcutId::ALL
            .into_iter()
            .map(|id| {
                let (label_key, fallback_label) = label_keys(id);
                ShortcutDefinition {
                    id,
                    label_key,
                    fallback_label,
                    category: id.category(),
                    defaults: defaults::shortcut_bindings(id, platform),
                }
            })
            .collect();

        let host_defaults = HOST_LABELS
            .into_iter()
            .zip(defaults::host_shortcut_bindings())
            .map(|((label_key, fallback_label), binding)| HostDefaultShortcut {
                label_key,
                fallback_label,
                binding,
            })
            .collect();

        log::debug!(
            "Shortcut registry initialized for {} with {} definitions",
            platform,
            definitions.len()
        );

        Self {
            platform,
            definitions,
            host_defaults,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_mac(&self) -> bool {
        self.platform.is_mac()
    }

    /// All definitions in registry order.
    pub fn definitions(&self) -> &[ShortcutDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: ShortcutId) -> &ShortcutDefinition {
        // Built from ShortcutId::ALL, which follows declaration order.
        &self.definitions[id as usize]
    }

    /// Bindings in effect for `id`: a non-empty override, else the defaults.
    pub fn effective_bindings<'a>(
        &'a self,
        id: ShortcutId,
        shortcuts: &'a ShortcutSettings,
    ) -> &'a [KeyBinding] {
        shortcuts
            .override_for(id)
            .unwrap_or_else(|| self.get(id).defaults.as_slice())
    }

    /// Whether the user has bound `id` to something other than its defaults.
    pub fn has_custom_binding(&self, id: ShortcutId, shortcuts: &ShortcutSettings) -> bool {
        let Some(current) = shortcuts.override_for(id) else {
            return false;
        };
        let defaults = &self.get(id).defaults;
        current.len() != defaults.len()
            || current
                .iter()
                .zip(defaults)
                .any(|(binding, default)| !bindings_equal(binding, default, self.is_mac()))
    }

    /// Settings with every toggle and binding at its default.
    pub fn default_settings(&self) -> Settings {
        defaults::settings(self.platform)
    }

    /// Host-owned chords in display order.
    pub fn host_defaults(&self) -> &[HostDefaultShortcut] {
        &self.host_defaults
    }
}
