//! Default key bindings for every shortcut id.

use crate::types::{KeyBinding, Platform, ShortcutId, ShortcutSettings};

fn letter(key: &str, code: &str) -> KeyBinding {
    KeyBinding::new(key).with_code(code)
}

/// Default bindings for a single shortcut on `platform`.
///
/// `modeInstant` differs on Windows: `Ctrl+Shift+0` is taken by the OS
/// input-language switcher there.
pub fn shortcut_bindings(id: ShortcutId, platform: Platform) -> Vec<KeyBinding> {
    let binding = match id {
        ShortcutId::ScrollTop => letter("k", "KeyK").with_mod(true),
        ShortcutId::ScrollBottom => letter("j", "KeyJ").with_mod(true),
        ShortcutId::ScrollUp => letter("k", "KeyK"),
        ShortcutId::ScrollDown => letter("j", "KeyJ"),
        ShortcutId::ScrollHalfUp => letter("K", "KeyK").with_shift(true),
        ShortcutId::ScrollHalfDown => letter("J", "KeyJ").with_shift(true),
        ShortcutId::ToggleFocus => letter(" ", "Space").with_shift(true),
        ShortcutId::ToggleModel => letter("ArrowDown", "ArrowDown")
            .with_mod(true)
            .with_shift(true),
        ShortcutId::ModeInstant if platform.is_windows() => {
            letter("7", "Digit7").with_mod(true).with_shift(true)
        }
        ShortcutId::ModeInstant => letter("0", "Digit0").with_mod(true).with_shift(true),
        ShortcutId::ModeThinking => letter("8", "Digit8").with_mod(true).with_shift(true),
        ShortcutId::ModePro => letter("9", "Digit9").with_mod(true).with_shift(true),
        ShortcutId::TemporaryChat => letter("i", "KeyI").with_mod(true),
        ShortcutId::ToggleShortcuts => letter("/", "Slash").with_mod(true),
        ShortcutId::DeleteChat => KeyBinding::new("Backspace").with_shift(true).with_mod(true),
        ShortcutId::UploadFiles => letter("u", "KeyU").with_mod(true),
        ShortcutId::PinChat => letter("p", "KeyP").with_mod(true).with_shift(true),
    };
    vec![binding]
}

/// Default bindings for every shortcut id.
pub fn shortcuts(platform: Platform) -> ShortcutSettings {
    ShortcutId::ALL
        .into_iter()
        .fold(ShortcutSettings::new(), |acc, id| {
            acc.with(id, shortcut_bindings(id, platform))
        })
}

/// Bindings the host application itself owns, in display order:
/// new chat, search, toggle side bar.
pub fn host_shortcut_bindings() -> [KeyBinding; 3] {
    [
        letter("O", "KeyO").with_mod(true).with_shift(true),
        letter("K", "KeyK").with_mod(true).with_shift(true),
        letter("S", "KeyS").with_mod(true).with_shift(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_a_default() {
        let defaults = shortcuts(Platform::Linux);
        for id in ShortcutId::ALL {
            assert!(defaults.override_for(id).is_some(), "{} has no default", id);
        }
    }

    #[test]
    fn test_mode_instant_differs_on_windows() {
        let windows = shortcut_bindings(ShortcutId::ModeInstant, Platform::Windows);
        let mac = shortcut_bindings(ShortcutId::ModeInstant, Platform::Mac);
        assert_eq!(windows[0].code(), Some("Digit7"));
        assert_eq!(mac[0].code(), Some("Digit0"));
        assert_eq!(
            shortcut_bindings(ShortcutId::ModeInstant, Platform::Linux)[0].code(),
            Some("Digit0")
        );
    }

    #[test]
    fn test_delete_chat_has_no_code() {
        let binding = &shortcut_bindings(ShortcutId::DeleteChat, Platform::Mac)[0];
        assert_eq!(binding.key(), "Backspace");
        assert_eq!(binding.code(), None);
    }
}
