//! Shortcut help panel model.
//!
//! Builds the list shown by the "Toggle Shortcuts List" shortcut. Sections
//! for disabled feature categories are left out; rendering is up to the host.

use crate::i18n::{MessageKey, Messages};
use chatkeys_config::{FeatureCategory, Settings, ShortcutId};
use chatkeys_keybindings::{ShortcutRegistry, binding_tokens};
use std::fmt;

/// One row of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpItem {
    pub label: String,
    /// Each combo is a list of display tokens, e.g. `["⌘", "⇧", "P"]`.
    pub combos: Vec<Vec<String>>,
    /// Link text for items that open something instead of showing a chord.
    pub action_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<HelpItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPanel {
    pub title: String,
    pub close_label: String,
    pub sections: Vec<HelpSection>,
}

impl HelpPanel {
    pub fn section(&self, title: &str) -> Option<&HelpSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

impl fmt::Display for HelpPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            for item in &section.items {
                let value = match &item.action_label {
                    Some(action) => format!("[{action}]"),
                    None => item
                        .combos
                        .iter()
                        .map(|combo| combo.join(" + "))
                        .collect::<Vec<_>>()
                        .join(" / "),
                };
                writeln!(f, "  {:<28} {}", item.label, value)?;
            }
        }
        Ok(())
    }
}

const VIM_SCROLL_ORDER: [ShortcutId; 6] = [
    ShortcutId::ScrollUp,
    ShortcutId::ScrollDown,
    ShortcutId::ScrollTop,
    ShortcutId::ScrollBottom,
    ShortcutId::ScrollHalfUp,
    ShortcutId::ScrollHalfDown,
];

const MODEL_ORDER: [ShortcutId; 3] = [
    ShortcutId::ToggleModel,
    ShortcutId::ModeInstant,
    ShortcutId::ModeThinking,
];

const OTHER_ORDER: [ShortcutId; 4] = [
    ShortcutId::TemporaryChat,
    ShortcutId::DeleteChat,
    ShortcutId::UploadFiles,
    ShortcutId::PinChat,
];

struct Builder<'a> {
    registry: &'a ShortcutRegistry,
    settings: &'a Settings,
    messages: &'a Messages,
}

impl Builder<'_> {
    fn item(&self, id: ShortcutId) -> HelpItem {
        let definition = self.registry.get(id);
        let is_mac = self.registry.is_mac();
        HelpItem {
            label: definition.label(self.messages),
            combos: self
                .registry
                .effective_bindings(id, &self.settings.shortcuts)
                .iter()
                .map(|binding| binding_tokens(binding, is_mac))
                .collect(),
            action_label: None,
        }
    }

    fn section(&self, title: MessageKey, ids: &[ShortcutId]) -> HelpSection {
        HelpSection {
            title: self.messages.text(title),
            items: ids.iter().map(|id| self.item(*id)).collect(),
        }
    }

    fn enabled(&self, category: FeatureCategory) -> bool {
        self.settings.feature_toggles.is_enabled(category)
    }
}

/// Assemble the panel for the current settings.
pub fn build_help_panel(
    registry: &ShortcutRegistry,
    settings: &Settings,
    messages: &Messages,
) -> HelpPanel {
    let builder = Builder {
        registry,
        settings,
        messages,
    };
    let is_mac = registry.is_mac();

    let mut host_items: Vec<HelpItem> = registry
        .host_defaults()
        .iter()
        .map(|host| HelpItem {
            label: host.label(messages),
            combos: vec![binding_tokens(&host.binding, is_mac)],
            action_label: None,
        })
        .collect();
    host_items.push(builder.item(ShortcutId::ToggleShortcuts));

    let mut sections = vec![
        HelpSection {
            title: messages.text(MessageKey::SectionHostDefaults),
            items: host_items,
        },
        HelpSection {
            title: messages.text(MessageKey::SectionSettings),
            items: vec![HelpItem {
                label: messages.text(MessageKey::ItemOpenSettings),
                combos: Vec::new(),
                action_label: Some(messages.text(MessageKey::ActionOpenSettingsLink)),
            }],
        },
    ];

    if builder.enabled(FeatureCategory::VimScroll) {
        sections.push(builder.section(MessageKey::SectionVimScroll, &VIM_SCROLL_ORDER));
    }
    if builder.enabled(FeatureCategory::WideScreen) {
        sections.push(builder.section(MessageKey::SectionWideScreen, &[ShortcutId::ToggleFocus]));
    }
    if builder.enabled(FeatureCategory::OtherShortcuts) {
        sections.push(builder.section(MessageKey::SectionModelSwitching, &MODEL_ORDER));
        sections.push(builder.section(MessageKey::SectionOther, &OTHER_ORDER));
    }

    HelpPanel {
        title: messages.text(MessageKey::DialogTitle),
        close_label: messages.text(MessageKey::DialogClose),
        sections,
    }
}
