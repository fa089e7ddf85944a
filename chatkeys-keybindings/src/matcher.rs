//! Key event matching.
//!
//! Matches live key events against bindings. A binding matches by abstract
//! key (case-insensitive) or, when it pins one, by physical code, so layouts
//! that produce a different character at the same position still work.

use crate::platform::normalize_binding;
use chatkeys_config::KeyBinding;

/// A key event as delivered by the input layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Abstract key, e.g. `"k"`, `"K"`, `"Enter"`, `" "`.
    pub key: String,
    /// Physical position, e.g. `"KeyK"`. Empty if unknown.
    pub code: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    /// Auto-repeat from a held key.
    pub repeat: bool,
    /// The event belongs to an IME composition.
    pub is_composing: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn composing(mut self) -> Self {
        self.is_composing = true;
        self
    }

    /// Whether the platform's canonical modifier is held.
    pub fn mod_pressed(&self, is_mac: bool) -> bool {
        if is_mac { self.meta } else { self.ctrl }
    }

    /// True for presses of a modifier key by itself.
    pub fn is_modifier_only(&self) -> bool {
        matches!(
            self.key.as_str(),
            "Meta" | "Control" | "Shift" | "Alt" | "AltGraph" | "OS"
        )
    }
}

/// Check a live event against one binding.
///
/// Never fails: bindings that could not have been saved simply never match.
pub fn matches(binding: &KeyBinding, event: &KeyEvent, is_mac: bool) -> bool {
    let normalized = normalize_binding(binding, is_mac);

    if event.mod_pressed(is_mac) != normalized.mod_key
        || event.meta != normalized.meta
        || event.ctrl != normalized.ctrl
        || event.shift != normalized.shift
        || event.alt != normalized.alt
    {
        return false;
    }

    let key_match = event.key.eq_ignore_ascii_case(binding.key())
        || event.key.to_lowercase() == binding.key().to_lowercase();
    let code_match = binding.code().is_some_and(|code| code == event.code);

    key_match || code_match
}

/// True if any of `bindings` matches the event.
pub fn matches_any(bindings: &[KeyBinding], event: &KeyEvent, is_mac: bool) -> bool {
    bindings.iter().any(|binding| matches(binding, event, is_mac))
}

/// Whether two bindings describe the same chord on this platform.
pub fn bindings_equal(a: &KeyBinding, b: &KeyBinding, is_mac: bool) -> bool {
    let na = normalize_binding(a, is_mac);
    let nb = normalize_binding(b, is_mac);
    if !na.same_modifiers(&nb) {
        return false;
    }

    let key_match = a.key().to_lowercase() == b.key().to_lowercase();
    let code_match = matches!((a.code(), b.code()), (Some(ca), Some(cb)) if ca == cb);
    key_match || code_match
}

/// Record a binding from a live event.
///
/// Every modifier flag is pinned so the binding replays exactly the chord
/// that was pressed. Presses of a bare modifier key yield `None`.
pub fn binding_from_event(event: &KeyEvent, is_mac: bool) -> Option<KeyBinding> {
    if event.is_modifier_only() {
        return None;
    }

    let mut binding = KeyBinding::new(event.key.clone())
        .with_mod(event.mod_pressed(is_mac))
        .with_meta(event.meta)
        .with_ctrl(event.ctrl)
        .with_shift(event.shift)
        .with_alt(event.alt);
    if !event.code.is_empty() {
        binding = binding.with_code(event.code.clone());
    }
    Some(binding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_match_is_case_insensitive() {
        let binding = KeyBinding::new("j").with_code("KeyJ");
        assert!(matches(&binding, &KeyEvent::new("J", ""), false));
        assert!(matches(&binding, &KeyEvent::new("j", "KeyJ"), true));
    }

    #[test]
    fn test_code_match_for_other_layouts() {
        let binding = KeyBinding::new("k").with_code("KeyK");
        assert!(matches(&binding, &KeyEvent::new("л", "KeyK"), false));
        assert!(!matches(&KeyBinding::new("k"), &KeyEvent::new("л", "KeyK"), false));
    }

    #[test]
    fn test_modifiers_must_match_exactly() {
        let binding = KeyBinding::new("k").with_code("KeyK").with_mod(true);
        assert!(matches(&binding, &KeyEvent::new("k", "KeyK").with_ctrl(), false));
        assert!(!matches(&binding, &KeyEvent::new("k", "KeyK").with_meta(), false));
        assert!(matches(&binding, &KeyEvent::new("k", "KeyK").with_meta(), true));
        assert!(!matches(&binding, &KeyEvent::new("k", "KeyK").with_ctrl(), true));
        assert!(!matches(
            &binding,
            &KeyEvent::new("k", "KeyK").with_ctrl().with_shift(),
            false
        ));
        assert!(!matches(&binding, &KeyEvent::new("k", "KeyK"), false));
    }

    #[test]
    fn test_shifted_key_matches_shift_binding() {
        let binding = KeyBinding::new("K").with_code("KeyK").with_shift(true);
        assert!(matches(&binding, &KeyEvent::new("K", "KeyK").with_shift(), false));
        assert!(!matches(&binding, &KeyEvent::new("k", "KeyK"), false));
    }

    #[test]
    fn test_bindings_equal() {
        let a = KeyBinding::new("p").with_code("KeyP").with_mod(true).with_shift(true);
        let b = KeyBinding::new("P").with_mod(true).with_shift(true);
        assert!(bindings_equal(&a, &b, false));

        let c = KeyBinding::new("x").with_code("KeyP").with_mod(true).with_shift(true);
        assert!(bindings_equal(&a, &c, true));

        let d = KeyBinding::new("p").with_code("KeyP").with_mod(true);
        assert!(!bindings_equal(&a, &d, false));
    }

    #[test]
    fn test_mod_equals_pinned_meta_on_mac() {
        let canonical = KeyBinding::new("k").with_mod(true);
        let meta = KeyBinding::new("k").with_meta(true);
        assert!(bindings_equal(&canonical, &meta, true));
        assert!(!bindings_equal(&canonical, &meta, false));
    }

    #[test]
    fn test_binding_from_event() {
        let event = KeyEvent::new("p", "KeyP").with_meta().with_shift();
        let binding = binding_from_event(&event, true).unwrap();
        assert_eq!(binding.explicit_mod(), Some(true));
        assert_eq!(binding.explicit_meta(), Some(true));
        assert_eq!(binding.explicit_ctrl(), Some(false));
        assert!(binding.shift());
        assert!(matches(&binding, &event, true));

        assert!(binding_from_event(&KeyEvent::new("Shift", "ShiftLeft").with_shift(), true).is_none());
    }
}
