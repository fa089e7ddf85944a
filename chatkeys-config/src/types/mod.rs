//! Settings value types.

mod feature;
mod keybinding;
mod platform;
mod shortcut;

pub use feature::{FeatureCategory, FeatureToggles};
pub use keybinding::{KeyBinding, ModifierIntent};
pub use platform::Platform;
pub use shortcut::{ShortcutId, ShortcutSettings};
