//! Localized UI messages.
//!
//! Every message has a stable id and built-in English text. A JSON dictionary
//! (`{"message_id": "text"}`) can override any of them. Placeholders `$1`,
//! `$2`, ... are replaced positionally.
//!
//! Shortcut and host labels are not in this catalog: their English text lives
//! in the registry, and a dictionary may only translate them.

use anyhow::{Context, Result};
use chatkeys_config::ConfigError;
use chatkeys_keybindings::{MessageLookup, label_message_ids};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

macro_rules! message_keys {
    ($($variant:ident => $id:literal, $text:literal;)+) => {
        /// Id of a user-visible message.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessageKey {
            $($variant,)+
        }

        impl MessageKey {
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant,)+];

            pub fn id(self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $id,)+
                }
            }

            /// Built-in English text.
            pub fn fallback(self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $text,)+
                }
            }
        }
    };
}

message_keys! {
    ShortcutConflictUser => "popup_shortcut_conflict_user",
        "\"$1\" is already assigned to \"$2\". Please choose a different key.";
    ShortcutConflictHost => "popup_shortcut_conflict_host",
        "\"$1\" conflicts with the default \"$2\" shortcut. The default may not work as expected.";
    ShortcutRequiresModifier => "error_shortcut_requires_modifier",
        "\"$1\" must be combined with a modifier key.";
    ShortcutForbiddenKey => "error_shortcut_forbidden_key",
        "\"$1\" cannot be used as a shortcut.";
    ShortcutSuccess => "popup_shortcut_success", "Shortcut for \"$1\" has been updated.";
    ShortcutError => "popup_shortcut_error", "Failed to save the shortcut. Please try again.";
    ResetSuccess => "popup_reset_success", "All settings have been restored to defaults.";
    SectionHostDefaults => "shortcuts_section_host_defaults", "Host Defaults";
    SectionSettings => "shortcuts_section_settings", "Settings";
    SectionVimScroll => "shortcuts_section_vim_scroll", "Vim Scroll";
    SectionWideScreen => "shortcuts_section_wide_screen", "Wide Screen";
    SectionModelSwitching => "shortcuts_section_model_switching", "Model Switching";
    SectionOther => "shortcuts_section_other", "Other";
    ItemOpenSettings => "shortcuts_item_open_settings", "Open Settings";
    ActionOpenSettingsLink => "shortcuts_action_open_settings_link", "Open";
    DialogTitle => "shortcuts_dialog_title", "Keyboard shortcuts";
    DialogClose => "shortcuts_dialog_close", "Close";
    ToastNoChatSelected => "toast_no_chat_selected", "No chat is currently selected.";
    ToastPinFailed => "toast_pin_failed", "Failed to pin chat.";
    ToastTempChatFailed => "toast_temp_chat_failed",
        "Could not open a temporary chat. Please reload the page.";
    ToastDeleteFailed => "toast_delete_failed", "Failed to delete chat.";
    ToastSendButtonMissing => "toast_send_button_missing", "Send button not found.";
    ToastSendButtonDisabled => "toast_send_button_disabled",
        "Send button is temporarily disabled. Please reload the page.";
    ToastUploadFailed => "toast_upload_failed", "Could not open the upload menu.";
    ToastModelSwitchFailed => "toast_model_switch_failed", "Could not switch the model.";
    ToastActionFailed => "toast_action_failed", "The shortcut could not be completed.";
    ToastActionBusy => "toast_action_busy", "Another action is still running.";
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MessageKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .iter()
            .copied()
            .find(|key| key.id() == s)
            .ok_or_else(|| ConfigError::UnknownValue {
                kind: "message id",
                value: s.to_string(),
            })
    }
}

/// Replace `$1..$n` with the given values.
///
/// Higher indices are replaced first so `$1` never eats the prefix of `$10`.
pub fn substitute(template: &str, substitutions: &[&str]) -> String {
    let mut out = template.to_string();
    for (index, value) in substitutions.iter().enumerate().rev() {
        out = out.replace(&format!("${}", index + 1), value);
    }
    out
}

/// Message catalog with optional translated overrides.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    overrides: HashMap<String, String>,
}

impl Messages {
    /// English-only catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        for id in overrides.keys() {
            let known = MessageKey::from_str(id).is_ok()
                || label_message_ids().any(|label| label == id.as_str());
            if !known {
                log::warn!("Ignoring translation for unknown message id '{}'", id);
            }
        }
        Self { overrides }
    }

    /// Parse a JSON dictionary of `id -> text`.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: HashMap<String, String> =
            serde_json::from_str(json).map_err(ConfigError::from)?;
        Ok(Self::with_overrides(overrides))
    }

    /// Load overrides from `path`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read messages file {:?}", path))?;
        let messages = Self::from_json(&json)
            .with_context(|| format!("Failed to parse messages file {:?}", path))?;
        log::info!(
            "Loaded {} translated message(s) from {:?}",
            messages.overrides.len(),
            path
        );
        Ok(messages)
    }

    /// Load overrides from `path` if it exists, else English only.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }
        Self::load_from_file(path).unwrap_or_else(|e| {
            log::warn!("Using built-in messages: {:#}", e);
            Self::new()
        })
    }

    /// Text for `key` with positional substitutions applied.
    pub fn get(&self, key: MessageKey, substitutions: &[&str]) -> String {
        let template = self
            .overrides
            .get(key.id())
            .map(String::as_str)
            .unwrap_or(key.fallback());
        substitute(template, substitutions)
    }

    pub fn text(&self, key: MessageKey) -> String {
        self.get(key, &[])
    }
}

impl MessageLookup for Messages {
    /// Translated text only; the caller supplies its own English fallback.
    fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.get(key).cloned()
    }
}
