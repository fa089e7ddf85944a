//! Platform-specific binding resolution.
//!
//! Contains:
//! - `mod` modifier expansion (Cmd on macOS, Ctrl elsewhere)
//! - Key and code display labels
//! - Modifier display labels

use chatkeys_config::{KeyBinding, ModifierIntent};

/// Which binding field decided the normalized `mod` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModSource {
    Mod,
    Meta,
    Ctrl,
    None,
}

/// A binding's modifier flags resolved for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedBinding {
    pub mod_key: bool,
    pub meta: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub mod_source: ModSource,
}

impl NormalizedBinding {
    /// Modifier equality, ignoring where `mod` came from.
    pub fn same_modifiers(&self, other: &NormalizedBinding) -> bool {
        self.mod_key == other.mod_key
            && self.meta == other.meta
            && self.ctrl == other.ctrl
            && self.shift == other.shift
            && self.alt == other.alt
    }

    /// True if no modifier at all is held.
    pub fn is_unmodified(&self) -> bool {
        !(self.mod_key || self.meta || self.ctrl || self.shift || self.alt)
    }
}

/// Resolve a binding's modifier intent for a platform.
///
/// A lone `ctrl` acts as `mod` everywhere, so it becomes Cmd on macOS. A lone
/// `meta` only stands in for `mod` on macOS; elsewhere it stays pinned to the
/// physical key and `mod` is false.
pub fn normalize_binding(binding: &KeyBinding, is_mac: bool) -> NormalizedBinding {
    let (mod_key, meta, ctrl, mod_source) = match binding.modifier() {
        ModifierIntent::Canonical { on, meta, ctrl } => (
            on,
            meta.unwrap_or(is_mac && on),
            ctrl.unwrap_or(!is_mac && on),
            ModSource::Mod,
        ),
        ModifierIntent::MetaOnly(meta) => (is_mac && meta, meta, false, ModSource::Meta),
        ModifierIntent::CtrlOnly(ctrl) => (ctrl, is_mac && ctrl, !is_mac && ctrl, ModSource::Ctrl),
        ModifierIntent::Pinned { meta, ctrl } => (false, meta, ctrl, ModSource::None),
        ModifierIntent::Unspecified => (false, false, false, ModSource::None),
    };

    NormalizedBinding {
        mod_key,
        meta,
        ctrl,
        alt: binding.alt(),
        shift: binding.shift(),
        mod_source,
    }
}

fn special_label(name: &str, is_mac: bool) -> Option<&'static str> {
    match name {
        " " | "Space" => Some("Space"),
        "Enter" => Some("Enter"),
        "Backspace" if is_mac => Some("⌫"),
        "Backspace" => Some("Backspace"),
        "ArrowUp" => Some("↑"),
        "ArrowDown" => Some("↓"),
        "ArrowLeft" => Some("←"),
        "ArrowRight" => Some("→"),
        _ => None,
    }
}

/// Label of the key at a physical position, e.g. `KeyX` → `X`, `Digit3` → `3`.
pub fn code_to_physical_key(code: &str) -> Option<String> {
    if let Some(letter) = code.strip_prefix("Key")
        && letter.len() == 1
        && letter.bytes().all(|b| b.is_ascii_uppercase())
    {
        return Some(letter.to_string());
    }
    if let Some(digit) = code.strip_prefix("Digit")
        && digit.len() == 1
        && digit.bytes().all(|b| b.is_ascii_digit())
    {
        return Some(digit.to_string());
    }

    let label = match code {
        "Space" => "Space",
        "Enter" => "Enter",
        "Backspace" => "Backspace",
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        _ => return None,
    };
    Some(label.to_string())
}

/// Display label for a binding's key.
///
/// Special keys win, then the physical position from `code`, then the raw key.
pub fn key_label(binding: &KeyBinding, is_mac: bool) -> String {
    if let Some(label) = special_label(binding.key(), is_mac) {
        return label.to_string();
    }
    if let Some(code) = binding.code() {
        if let Some(label) = special_label(code, is_mac) {
            return label.to_string();
        }
        if let Some(label) = code_to_physical_key(code) {
            return label;
        }
    }
    binding.key().to_string()
}

/// Label of the canonical modifier.
pub fn mod_label(is_mac: bool, use_symbol: bool) -> &'static str {
    match (is_mac, use_symbol) {
        (true, true) => "⌘",
        (true, false) => "Cmd",
        (false, _) => "Ctrl",
    }
}

pub fn alt_label(is_mac: bool, use_symbol: bool) -> &'static str {
    match (is_mac, use_symbol) {
        (true, true) => "⌥",
        (true, false) => "Option",
        (false, _) => "Alt",
    }
}

pub fn shift_label(is_mac: bool) -> &'static str {
    if is_mac { "⇧" } else { "Shift" }
}
