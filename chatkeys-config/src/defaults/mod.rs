//! Default values for settings.
//!
//! Feature toggles and shortcut bindings live here so both the settings
//! merge and the shortcut registry read the same source of truth.

mod shortcuts;

pub use shortcuts::{host_shortcut_bindings, shortcut_bindings, shortcuts};

use crate::config::Settings;
use crate::types::{FeatureToggles, Platform};

/// Default feature toggles: everything on except scroll preservation on send.
pub fn feature_toggles() -> FeatureToggles {
    FeatureToggles {
        preserve_scroll_on_send: false,
        vim_scroll: true,
        keep_desktop_ui: true,
        wide_screen: true,
        safe_send: true,
        other_shortcuts: true,
    }
}

/// Complete default settings for `platform`.
pub fn settings(platform: Platform) -> Settings {
    Settings {
        feature_toggles: feature_toggles(),
        shortcuts: shortcuts(platform),
    }
}

/// Debounce window for settings file reloads.
pub fn reload_debounce_ms() -> u64 {
    100
}
