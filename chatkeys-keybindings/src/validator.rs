//! Edit-time binding validation.
//!
//! Rejects chords the host page or the OS needs for itself (Enter, Tab, IME
//! and lock keys, the Windows key) and bare editing keys that would fire
//! while typing.

use crate::platform::{NormalizedBinding, normalize_binding};
use chatkeys_config::KeyBinding;
use thiserror::Error;

const DISALLOWED_KEYS: &[&str] = &[
    "enter",
    "return",
    "tab",
    // IME / input-mode switching
    "eisu",
    "alphanumeric",
    "kanamode",
    "zenkaku",
    "hankaku",
    "hankakuzenkaku",
    "henkan",
    "convert",
    "muhenkan",
    "nonconvert",
    "kana",
    "kanji",
    "katakana",
    "hiragana",
    "romaji",
    "lang1",
    "lang2",
    "lang3",
    "lang4",
    "lang5",
    // Locks
    "capslock",
    "numlock",
    "scrolllock",
];

const DISALLOWED_CODES: &[&str] = &[
    "enter",
    "numpadenter",
    "tab",
    "eisu",
    "alphanumeric",
    "kanamode",
    "convert",
    "nonconvert",
    "lang1",
    "lang2",
    "lang3",
    "lang4",
    "lang5",
    "hankakuzenkaku",
    "capslock",
    "numlock",
    "scrolllock",
];

const WINDOWS_KEY_NAMES: &[&str] = &["meta", "os", "win", "super"];
const WINDOWS_KEY_CODES: &[&str] = &["metaleft", "metaright", "osleft", "osright"];

const MODIFIER_REQUIRED_KEYS: &[&str] = &["escape", "esc", "backspace", "delete"];
const MODIFIER_REQUIRED_CODES: &[&str] = &["escape", "backspace", "delete"];

/// Why a binding was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The key can never be used as a shortcut.
    DisallowedKey,
    /// The key is only allowed together with a modifier.
    RequiresModifier,
}

/// A binding that may not be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBinding {
    #[error("\"{key}\" cannot be used as a shortcut")]
    DisallowedKey { key: String },
    #[error("\"{key}\" must be combined with a modifier key")]
    RequiresModifier { key: String },
}

impl InvalidBinding {
    pub fn reason(&self) -> RejectReason {
        match self {
            InvalidBinding::DisallowedKey { .. } => RejectReason::DisallowedKey,
            InvalidBinding::RequiresModifier { .. } => RejectReason::RequiresModifier,
        }
    }

    /// The rejected binding's key.
    pub fn key(&self) -> &str {
        match self {
            InvalidBinding::DisallowedKey { key } | InvalidBinding::RequiresModifier { key } => key,
        }
    }
}

fn lowered(binding: &KeyBinding) -> (String, String) {
    (
        binding.key().to_lowercase(),
        binding.code().map(str::to_lowercase).unwrap_or_default(),
    )
}

fn is_windows_key(key: &str, code: &str, normalized: &NormalizedBinding, is_mac: bool) -> bool {
    if is_mac {
        return false;
    }
    WINDOWS_KEY_NAMES.contains(&key)
        || WINDOWS_KEY_CODES.contains(&code)
        || code.starts_with("meta")
        || normalized.meta
}

/// Check whether `binding` may be assigned on this platform.
///
/// Disallowed keys are reported before missing modifiers.
pub fn validate_binding(binding: &KeyBinding, is_mac: bool) -> Result<(), InvalidBinding> {
    let normalized = normalize_binding(binding, is_mac);
    let (key, code) = lowered(binding);

    if DISALLOWED_KEYS.contains(&key.as_str())
        || DISALLOWED_CODES.contains(&code.as_str())
        || is_windows_key(&key, &code, &normalized, is_mac)
    {
        return Err(InvalidBinding::DisallowedKey {
            key: binding.key().to_string(),
        });
    }

    let needs_modifier = MODIFIER_REQUIRED_KEYS.contains(&key.as_str())
        || MODIFIER_REQUIRED_CODES.contains(&code.as_str());
    if needs_modifier && normalized.is_unmodified() {
        return Err(InvalidBinding::RequiresModifier {
            key: binding.key().to_string(),
        });
    }

    Ok(())
}
