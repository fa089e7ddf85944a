//! Feature categories and their enable/disable toggles.

use serde::{Deserialize, Serialize};

/// A feature group that can be switched on or off as a whole.
///
/// Every shortcut definition belongs to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureCategory {
    PreserveScrollOnSend,
    VimScroll,
    #[serde(rename = "keepDesktopUI")]
    KeepDesktopUi,
    WideScreen,
    SafeSend,
    OtherShortcuts,
}

impl FeatureCategory {
    /// All categories in settings-screen order.
    pub const ALL: [FeatureCategory; 6] = [
        FeatureCategory::PreserveScrollOnSend,
        FeatureCategory::VimScroll,
        FeatureCategory::KeepDesktopUi,
        FeatureCategory::WideScreen,
        FeatureCategory::SafeSend,
        FeatureCategory::OtherShortcuts,
    ];

    /// Stable identifier used in settings files and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureCategory::PreserveScrollOnSend => "preserveScrollOnSend",
            FeatureCategory::VimScroll => "vimScroll",
            FeatureCategory::KeepDesktopUi => "keepDesktopUI",
            FeatureCategory::WideScreen => "wideScreen",
            FeatureCategory::SafeSend => "safeSend",
            FeatureCategory::OtherShortcuts => "otherShortcuts",
        }
    }
}

/// Per-category enable flags.
///
/// Missing fields in a settings file fall back to the defaults from
/// [`crate::defaults::feature_toggles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureToggles {
    pub preserve_scroll_on_send: bool,
    pub vim_scroll: bool,
    #[serde(rename = "keepDesktopUI")]
    pub keep_desktop_ui: bool,
    pub wide_screen: bool,
    pub safe_send: bool,
    pub other_shortcuts: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        crate::defaults::feature_toggles()
    }
}

impl FeatureToggles {
    /// Every category enabled.
    pub fn all_enabled() -> Self {
        Self {
            preserve_scroll_on_send: true,
            vim_scroll: true,
            keep_desktop_ui: true,
            wide_screen: true,
            safe_send: true,
            other_shortcuts: true,
        }
    }

    pub fn is_enabled(&self, category: FeatureCategory) -> bool {
        match category {
            FeatureCategory::PreserveScrollOnSend => self.preserve_scroll_on_send,
            FeatureCategory::VimScroll => self.vim_scroll,
            FeatureCategory::KeepDesktopUi => self.keep_desktop_ui,
            FeatureCategory::WideScreen => self.wide_screen,
            FeatureCategory::SafeSend => self.safe_send,
            FeatureCategory::OtherShortcuts => self.other_shortcuts,
        }
    }

    pub fn set(&mut self, category: FeatureCategory, enabled: bool) {
        let slot = match category {
            FeatureCategory::PreserveScrollOnSend => &mut self.preserve_scroll_on_send,
            FeatureCategory::VimScroll => &mut self.vim_scroll,
            FeatureCategory::KeepDesktopUi => &mut self.keep_desktop_ui,
            FeatureCategory::WideScreen => &mut self.wide_screen,
            FeatureCategory::SafeSend => &mut self.safe_send,
            FeatureCategory::OtherShortcuts => &mut self.other_shortcuts,
        };
        *slot = enabled;
    }

    /// Copy of these toggles with one category changed.
    pub fn with(mut self, category: FeatureCategory, enabled: bool) -> Self {
        self.set(category, enabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let toggles = FeatureToggles::default();
        assert!(!toggles.is_enabled(FeatureCategory::PreserveScrollOnSend));
        for category in FeatureCategory::ALL
            .into_iter()
            .filter(|c| *c != FeatureCategory::PreserveScrollOnSend)
        {
            assert!(toggles.is_enabled(category), "{:?}", category);
        }
    }

    #[test]
    fn test_with_changes_single_category() {
        let toggles = FeatureToggles::all_enabled().with(FeatureCategory::OtherShortcuts, false);
        assert!(!toggles.is_enabled(FeatureCategory::OtherShortcuts));
        assert!(toggles.is_enabled(FeatureCategory::VimScroll));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let toggles: FeatureToggles = serde_yaml_ng::from_str("vimScroll: false\n").unwrap();
        assert!(!toggles.vim_scroll);
        assert!(toggles.safe_send);
        assert!(!toggles.preserve_scroll_on_send);
    }

    #[test]
    fn test_keep_desktop_ui_name() {
        let json = serde_json::to_string(&FeatureCategory::KeepDesktopUi).unwrap();
        assert_eq!(json, "\"keepDesktopUI\"");
        assert_eq!(FeatureCategory::KeepDesktopUi.as_str(), "keepDesktopUI");
    }
}
