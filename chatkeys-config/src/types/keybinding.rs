//! Key binding and modifier intent types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Modifier intent
// ============================================================================

/// How a binding expresses its primary accelerator modifier.
///
/// The intent is fixed when the binding is built (or deserialized) from the
/// optional `mod` / `meta` / `ctrl` fields, so an explicit `false` is never
/// confused with an absent field later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierIntent {
    /// `mod` was given: Cmd on macOS, Ctrl elsewhere. `meta` and `ctrl` may
    /// additionally be pinned to an exact value.
    Canonical {
        on: bool,
        meta: Option<bool>,
        ctrl: Option<bool>,
    },
    /// Only `meta` was given.
    MetaOnly(bool),
    /// Only `ctrl` was given.
    CtrlOnly(bool),
    /// Both `meta` and `ctrl` were given, without `mod`.
    Pinned { meta: bool, ctrl: bool },
    /// No accelerator information at all.
    Unspecified,
}

impl ModifierIntent {
    /// Derive the intent from the optional flat fields.
    pub fn from_fields(mod_flag: Option<bool>, meta: Option<bool>, ctrl: Option<bool>) -> Self {
        match (mod_flag, meta, ctrl) {
            (Some(on), meta, ctrl) => Self::Canonical { on, meta, ctrl },
            (None, Some(meta), None) => Self::MetaOnly(meta),
            (None, None, Some(ctrl)) => Self::CtrlOnly(ctrl),
            (None, Some(meta), Some(ctrl)) => Self::Pinned { meta, ctrl },
            (None, None, None) => Self::Unspecified,
        }
    }

    /// The flat `(mod, meta, ctrl)` fields this intent was built from.
    pub fn fields(self) -> (Option<bool>, Option<bool>, Option<bool>) {
        match self {
            Self::Canonical { on, meta, ctrl } => (Some(on), meta, ctrl),
            Self::MetaOnly(meta) => (None, Some(meta), None),
            Self::CtrlOnly(ctrl) => (None, None, Some(ctrl)),
            Self::Pinned { meta, ctrl } => (None, Some(meta), Some(ctrl)),
            Self::Unspecified => (None, None, None),
        }
    }
}

// ============================================================================
// Key binding
// ============================================================================

/// A single chord: a key identity plus modifier flags.
///
/// Bindings are values; the `with_*` builders return a new binding instead
/// of mutating in place.
///
/// On disk a binding keeps the flat shape
/// `{ key, code?, mod?, meta?, ctrl?, shift?, alt? }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawKeyBinding", into = "RawKeyBinding")]
pub struct KeyBinding {
    key: String,
    code: Option<String>,
    modifier: ModifierIntent,
    shift: bool,
    alt: bool,
}

impl KeyBinding {
    /// A binding for `key` with no modifiers and no physical code.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: None,
            modifier: ModifierIntent::Unspecified,
            shift: false,
            alt: false,
        }
    }

    /// Same binding with a physical key code (e.g. `KeyK`, `Digit0`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Same binding with the canonical `mod` flag set explicitly.
    pub fn with_mod(self, on: bool) -> Self {
        let (_, meta, ctrl) = self.modifier.fields();
        self.with_intent(ModifierIntent::from_fields(Some(on), meta, ctrl))
    }

    /// Same binding with `meta` set explicitly.
    pub fn with_meta(self, on: bool) -> Self {
        let (mod_flag, _, ctrl) = self.modifier.fields();
        self.with_intent(ModifierIntent::from_fields(mod_flag, Some(on), ctrl))
    }

    /// Same binding with `ctrl` set explicitly.
    pub fn with_ctrl(self, on: bool) -> Self {
        let (mod_flag, meta, _) = self.modifier.fields();
        self.with_intent(ModifierIntent::from_fields(mod_flag, meta, Some(on)))
    }

    pub fn with_shift(mut self, on: bool) -> Self {
        self.shift = on;
        self
    }

    pub fn with_alt(mut self, on: bool) -> Self {
        self.alt = on;
        self
    }

    pub fn with_intent(mut self, modifier: ModifierIntent) -> Self {
        self.modifier = modifier;
        self
    }

    /// Abstract key label, e.g. `"k"`, `"ArrowDown"`, `" "`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Physical key code, if the binding pins one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn modifier(&self) -> ModifierIntent {
        self.modifier
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn alt(&self) -> bool {
        self.alt
    }

    /// The explicit `mod` field, if one was provided.
    pub fn explicit_mod(&self) -> Option<bool> {
        self.modifier.fields().0
    }

    /// The explicit `meta` field, if one was provided.
    pub fn explicit_meta(&self) -> Option<bool> {
        self.modifier.fields().1
    }

    /// The explicit `ctrl` field, if one was provided.
    pub fn explicit_ctrl(&self) -> Option<bool> {
        self.modifier.fields().2
    }
}

/// Flat serialized shape of a [`KeyBinding`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKeyBinding {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(rename = "mod", default, skip_serializing_if = "Option::is_none")]
    mod_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ctrl: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    shift: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    alt: bool,
}

impl From<RawKeyBinding> for KeyBinding {
    fn from(raw: RawKeyBinding) -> Self {
        Self {
            key: raw.key,
            code: raw.code,
            modifier: ModifierIntent::from_fields(raw.mod_flag, raw.meta, raw.ctrl),
            shift: raw.shift,
            alt: raw.alt,
        }
    }
}

impl From<KeyBinding> for RawKeyBinding {
    fn from(binding: KeyBinding) -> Self {
        let (mod_flag, meta, ctrl) = binding.modifier.fields();
        Self {
            key: binding.key,
            code: binding.code,
            mod_flag,
            meta,
            ctrl,
            shift: binding.shift,
            alt: binding.alt,
        }
    }
}
