//! Key combination parser and formatter.
//!
//! Parses human-readable chords like "Mod+Shift+P" into [`KeyBinding`]s and
//! renders bindings back as display tokens ("⌘ + ⇧ + P"). Physical key codes
//! are written in brackets for layout-independent bindings (e.g.
//! "Ctrl+[KeyZ]").

use crate::platform::{alt_label, key_label, mod_label, normalize_binding, shift_label};
use chatkeys_config::KeyBinding;
use thiserror::Error;

/// Error type for chord parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(String);

#[derive(Debug, Default)]
struct ParsedModifiers {
    mod_key: bool,
    meta: bool,
    ctrl: bool,
    alt: bool,
    shift: bool,
}

/// Parse a chord string into a binding.
///
/// Modifiers (case-insensitive):
/// - `Mod`, `CmdOrCtrl` - Cmd on macOS, Ctrl elsewhere
/// - `Cmd`, `Command`, `Meta`, `Super`, `Win` - the Meta key itself
/// - `Ctrl`, `Control` - Control; alone it acts like `Mod` (Cmd on macOS)
/// - `Alt`, `Option`
/// - `Shift`
///
/// Keys: single characters, named keys (`Space`, `Enter`, `Esc`,
/// `Backspace`, `Delete`, `Tab`, arrows, `F1`-`F12`) or `[Code]`.
pub fn parse_binding(s: &str) -> Result<KeyBinding, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError("Empty key combination".to_string()));
    }

    // A trailing "+" is the plus key itself, e.g. "Mod++".
    let (head, plus_key) = match s.strip_suffix("++") {
        Some(head) => (head, true),
        None if s == "+" => ("", true),
        None => (s, false),
    };

    let parts: Vec<&str> = if head.is_empty() {
        Vec::new()
    } else {
        head.split('+').map(str::trim).collect()
    };

    let mut modifiers = ParsedModifiers::default();
    let mut key_part: Option<&str> = plus_key.then_some("+");

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;
        let is_modifier = match part.to_lowercase().as_str() {
            "mod" | "cmdorctrl" => {
                modifiers.mod_key = true;
                true
            }
            "cmd" | "command" | "meta" | "super" | "win" => {
                modifiers.meta = true;
                true
            }
            "ctrl" | "control" => {
                modifiers.ctrl = true;
                true
            }
            "alt" | "option" => {
                modifiers.alt = true;
                true
            }
            "shift" => {
                modifiers.shift = true;
                true
            }
            _ => false,
        };

        if is_modifier {
            if is_last && key_part.is_none() {
                return Err(ParseError(
                    "Key combination ends with modifier, no key specified".to_string(),
                ));
            }
            continue;
        }
        if part.is_empty() {
            return Err(ParseError(format!("Empty key in '{}'", s)));
        }
        if let Some(existing) = key_part {
            return Err(ParseError(format!(
                "Multiple keys specified: already have '{}', found '{}'",
                existing, part
            )));
        }
        key_part = Some(part);
    }

    let key_str = key_part.ok_or_else(|| ParseError("No key specified".to_string()))?;
    let (key, code) = parse_key(key_str, modifiers.shift)?;

    let mut binding = KeyBinding::new(key);
    if let Some(code) = code {
        binding = binding.with_code(code);
    }
    if modifiers.mod_key {
        binding = binding.with_mod(true);
    }
    if modifiers.meta {
        binding = binding.with_meta(true);
    }
    if modifiers.ctrl {
        binding = binding.with_ctrl(true);
    }
    Ok(binding.with_alt(modifiers.alt).with_shift(modifiers.shift))
}

/// Parse a key string into `(key, code)`.
fn parse_key(s: &str, shift: bool) -> Result<(String, Option<String>), ParseError> {
    if let Some(code) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ParseError(format!("Invalid physical key code: '{}'", code)));
        }
        let key = key_for_code(code, shift);
        return Ok((key, Some(code.to_string())));
    }

    if let Some((key, code)) = parse_named_key(s) {
        return Ok((key.to_string(), Some(code.to_string())));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let key = if shift {
                c.to_uppercase().collect()
            } else {
                c.to_lowercase().collect()
            };
            Ok((key, code_for_char(c)))
        }
        _ => Err(ParseError(format!("Unknown key: '{}'", s))),
    }
}

/// Map a named key alias to its `(key, code)` pair.
fn parse_named_key(s: &str) -> Option<(&'static str, &'static str)> {
    let named = match s.to_lowercase().as_str() {
        "space" => (" ", "Space"),
        "enter" | "return" => ("Enter", "Enter"),
        "escape" | "esc" => ("Escape", "Escape"),
        "backspace" => ("Backspace", "Backspace"),
        "delete" | "del" => ("Delete", "Delete"),
        "tab" => ("Tab", "Tab"),
        "up" | "arrowup" => ("ArrowUp", "ArrowUp"),
        "down" | "arrowdown" => ("ArrowDown", "ArrowDown"),
        "left" | "arrowleft" => ("ArrowLeft", "ArrowLeft"),
        "right" | "arrowright" => ("ArrowRight", "ArrowRight"),
        "home" => ("Home", "Home"),
        "end" => ("End", "End"),
        "pageup" | "pgup" => ("PageUp", "PageUp"),
        "pagedown" | "pgdn" => ("PageDown", "PageDown"),
        "f1" => ("F1", "F1"),
        "f2" => ("F2", "F2"),
        "f3" => ("F3", "F3"),
        "f4" => ("F4", "F4"),
        "f5" => ("F5", "F5"),
        "f6" => ("F6", "F6"),
        "f7" => ("F7", "F7"),
        "f8" => ("F8", "F8"),
        "f9" => ("F9", "F9"),
        "f10" => ("F10", "F10"),
        "f11" => ("F11", "F11"),
        "f12" => ("F12", "F12"),
        _ => return None,
    };
    Some(named)
}

/// Physical code of a character on a US QWERTY layout.
fn code_for_char(c: char) -> Option<String> {
    if c.is_ascii_alphabetic() {
        return Some(format!("Key{}", c.to_ascii_uppercase()));
    }
    if c.is_ascii_digit() {
        return Some(format!("Digit{}", c));
    }
    let code = match c {
        ' ' => "Space",
        '/' => "Slash",
        '\\' => "Backslash",
        '.' => "Period",
        ',' => "Comma",
        ';' => "Semicolon",
        '\'' => "Quote",
        '`' => "Backquote",
        '-' => "Minus",
        '=' => "Equal",
        '[' => "BracketLeft",
        ']' => "BracketRight",
        _ => return None,
    };
    Some(code.to_string())
}

fn key_for_code(code: &str, shift: bool) -> String {
    if let Some(letter) = code.strip_prefix("Key")
        && letter.len() == 1
    {
        return if shift {
            letter.to_uppercase()
        } else {
            letter.to_lowercase()
        };
    }
    if let Some(digit) = code.strip_prefix("Digit")
        && digit.len() == 1
    {
        return digit.to_string();
    }
    match code {
        "Space" => " ".to_string(),
        "Slash" => "/".to_string(),
        other => other.to_string(),
    }
}

/// Display tokens for a binding, e.g. `["⌘", "⇧", "P"]`.
///
/// Pinned Meta is always shown as `⌘` and pinned Ctrl as `Ctrl`, whatever
/// the platform.
pub fn binding_tokens(binding: &KeyBinding, is_mac: bool) -> Vec<String> {
    let normalized = normalize_binding(binding, is_mac);
    let mut tokens = Vec::new();

    if normalized.mod_key {
        tokens.push(mod_label(is_mac, true).to_string());
    } else {
        if normalized.meta {
            tokens.push(mod_label(true, true).to_string());
        }
        if normalized.ctrl {
            tokens.push("Ctrl".to_string());
        }
    }
    if normalized.alt {
        tokens.push(alt_label(is_mac, true).to_string());
    }
    if normalized.shift {
        tokens.push(shift_label(is_mac).to_string());
    }
    tokens.push(key_label(binding, is_mac));
    tokens
}

/// Human-readable chord, tokens joined by `" + "`.
pub fn format_binding(binding: &KeyBinding, is_mac: bool) -> String {
    binding_tokens(binding, is_mac).join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatkeys_config::ModifierIntent;

    #[test]
    fn test_parse_mod_shift_letter() {
        let binding = parse_binding("Mod+Shift+P").unwrap();
        assert_eq!(binding.key(), "P");
        assert_eq!(binding.code(), Some("KeyP"));
        assert!(binding.shift());
        assert_eq!(binding.explicit_mod(), Some(true));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let binding = parse_binding("cmdorctrl+k").unwrap();
        assert_eq!(binding.key(), "k");
        assert_eq!(binding.explicit_mod(), Some(true));
    }

    #[test]
    fn test_parse_explicit_meta_and_ctrl() {
        assert_eq!(
            parse_binding("Cmd+K").unwrap().modifier(),
            ModifierIntent::MetaOnly(true)
        );
        assert_eq!(
            parse_binding("Ctrl+K").unwrap().modifier(),
            ModifierIntent::CtrlOnly(true)
        );
        assert_eq!(
            parse_binding("Ctrl+Meta+K").unwrap().modifier(),
            ModifierIntent::Pinned {
                meta: true,
                ctrl: true
            }
        );
    }

    #[test]
    fn test_parse_physical_key() {
        let binding = parse_binding("Ctrl+[KeyZ]").unwrap();
        assert_eq!(binding.key(), "z");
        assert_eq!(binding.code(), Some("KeyZ"));

        assert!(parse_binding("Ctrl+[]").is_err());
        assert!(parse_binding("Ctrl+[Key-Z]").is_err());
    }

    #[test]
    fn test_parse_named_keys() {
        let space = parse_binding("Shift+Space").unwrap();
        assert_eq!(space.key(), " ");
        assert_eq!(space.code(), Some("Space"));

        let down = parse_binding("Mod+Shift+Down").unwrap();
        assert_eq!(down.key(), "ArrowDown");

        let slash = parse_binding("Mod+/").unwrap();
        assert_eq!(slash.code(), Some("Slash"));
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = parse_binding("Mod++").unwrap();
        assert_eq!(binding.key(), "+");
        assert_eq!(binding.explicit_mod(), Some(true));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_binding("").is_err());
        assert!(parse_binding("Ctrl+Shift").is_err());
        assert!(parse_binding("Ctrl+A+B").is_err());
        assert!(parse_binding("Ctrl+Banana").is_err());
    }

    #[test]
    fn test_format_binding() {
        let binding = parse_binding("Mod+Shift+P").unwrap();
        assert_eq!(format_binding(&binding, true), "⌘ + ⇧ + P");
        assert_eq!(format_binding(&binding, false), "Ctrl + Shift + P");

        let alt = parse_binding("Alt+[KeyL]").unwrap();
        assert_eq!(binding_tokens(&alt, true), vec!["⌥", "L"]);
    }

    #[test]
    fn test_format_pinned_modifiers() {
        // Pinned Meta off Mac still shows the Cmd symbol.
        let binding = parse_binding("Cmd+K").unwrap();
        assert_eq!(format_binding(&binding, false), "⌘ + K");

        // A lone Ctrl is the canonical modifier, shown as Cmd on Mac.
        let binding = parse_binding("Ctrl+K").unwrap();
        assert_eq!(format_binding(&binding, true), "⌘ + K");
        assert_eq!(format_binding(&binding, false), "Ctrl + K");

        let both = parse_binding("Ctrl+Meta+K").unwrap();
        assert_eq!(format_binding(&both, true), "⌘ + Ctrl + K");
    }
}
