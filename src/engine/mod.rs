//! Shortcut dispatch engine.
//!
//! The engine sees every key press before the page does. It tries candidate
//! shortcuts in a fixed priority order, runs the first one whose effective
//! bindings match, and tells the host what to do with the original event.
//!
//! Priority:
//! 1. Enter-to-send gate (`safeSend`)
//! 2. Vim scroll motions (`vimScroll`), which the host may decline
//! 3. Focus toggle (`wideScreen`)
//! 4. Help panel toggle, never gated
//! 5. Chat actions and model switching (`otherShortcuts`)

pub mod actions;
pub mod scroll;
pub mod send_gate;

pub use actions::{
    Action, ActionError, ActionHandler, EventDisposition, ModelMode, NotifyLevel, ScrollKind,
};
pub use scroll::{ScrollDirection, ScrollMetrics, ScrollMotion, plan_scroll};
pub use send_gate::SendDecision;

use crate::help::{HelpPanel, build_help_panel};
use crate::i18n::Messages;
use chatkeys_config::{FeatureCategory, Platform, Settings, ShortcutId};
use chatkeys_keybindings::{KeyEvent, ShortcutRegistry, matches_any};

/// Facts about the event target that the engine cannot see itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Focus is in a text field or contenteditable.
    pub editable_target: bool,
}

impl KeyContext {
    pub fn editable() -> Self {
        Self {
            editable_target: true,
        }
    }
}

/// What caused a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Send,
    Newline,
    Shortcut(ShortcutId),
}

/// Result of one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub trigger: Option<Trigger>,
    pub disposition: EventDisposition,
}

impl Dispatch {
    /// Nothing matched; the event is untouched.
    pub const IGNORED: Self = Self {
        trigger: None,
        disposition: EventDisposition::NONE,
    };

    fn new(trigger: Trigger, disposition: EventDisposition) -> Self {
        Self {
            trigger: Some(trigger),
            disposition,
        }
    }

    pub fn is_handled(&self) -> bool {
        self.trigger.is_some()
    }

    pub fn shortcut(&self) -> Option<ShortcutId> {
        match self.trigger {
            Some(Trigger::Shortcut(id)) => Some(id),
            _ => None,
        }
    }
}

const SCROLL_CANDIDATES: [(ShortcutId, ScrollKind); 6] = [
    (ShortcutId::ScrollTop, ScrollKind::Top),
    (ShortcutId::ScrollBottom, ScrollKind::Bottom),
    (ShortcutId::ScrollHalfUp, ScrollKind::HalfUp),
    (ShortcutId::ScrollHalfDown, ScrollKind::HalfDown),
    (ShortcutId::ScrollUp, ScrollKind::Up),
    (ShortcutId::ScrollDown, ScrollKind::Down),
];

/// Only fire once the user has rebound them away from the defaults.
const CUSTOM_ONLY_CANDIDATES: [(ShortcutId, Action); 4] = [
    (ShortcutId::UploadFiles, Action::UploadFiles),
    (ShortcutId::PinChat, Action::PinChat),
    (ShortcutId::TemporaryChat, Action::TemporaryChat),
    (ShortcutId::DeleteChat, Action::DeleteChat),
];

const MODEL_CANDIDATES: [(ShortcutId, Action); 3] = [
    (ShortcutId::ToggleModel, Action::ToggleModel),
    (ShortcutId::ModeInstant, Action::SelectMode(ModelMode::Instant)),
    (ShortcutId::ModeThinking, Action::SelectMode(ModelMode::Thinking)),
];

/// Keyboard shortcut engine bound to one host.
pub struct ShortcutEngine<H: ActionHandler> {
    registry: ShortcutRegistry,
    settings: Settings,
    messages: Messages,
    handler: H,
    /// An IME composition is in progress.
    composing: bool,
    /// Key whose release ends continuous scrolling.
    scrolling_key: Option<String>,
}

impl<H: ActionHandler> ShortcutEngine<H> {
    pub fn new(settings: Settings, platform: Platform, handler: H) -> Self {
        log::info!("Shortcut engine started for {}", platform);
        Self {
            registry: ShortcutRegistry::new(platform),
            settings,
            messages: Messages::new(),
            handler,
            composing: false,
            scrolling_key: None,
        }
    }

    /// Use translated messages for toasts and the help panel.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Key currently driving continuous scrolling, if any.
    pub fn scrolling_key(&self) -> Option<&str> {
        self.scrolling_key.as_deref()
    }

    pub fn on_composition_start(&mut self) {
        self.composing = true;
    }

    pub fn on_composition_end(&mut self) {
        self.composing = false;
    }

    /// Replace the settings snapshot.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !self.enabled(FeatureCategory::VimScroll) {
            self.stop_scrolling();
        }
        if self.handler.help_visible() {
            let panel = self.help_panel();
            self.handler.show_help(panel);
        }
        log::debug!("Shortcut engine settings replaced");
    }

    /// Help panel for the current settings.
    pub fn help_panel(&self) -> HelpPanel {
        build_help_panel(&self.registry, &self.settings, &self.messages)
    }

    /// Release of the key that started continuous scrolling stops it.
    ///
    /// Returns true when a scroll was stopped.
    pub fn on_key_up(&mut self, event: &KeyEvent) -> bool {
        if self.scrolling_key.as_deref() == Some(event.key.as_str()) {
            self.stop_scrolling();
            return true;
        }
        false
    }

    pub fn on_key_down(&mut self, event: &KeyEvent, ctx: &KeyContext) -> Dispatch {
        let dispatch = self.dispatch(event, ctx);
        if let Some(trigger) = dispatch.trigger {
            log::debug!(
                "Key {:?} ({}) dispatched to {:?}",
                event.key,
                event.code,
                trigger
            );
        }
        dispatch
    }

    fn dispatch(&mut self, event: &KeyEvent, ctx: &KeyContext) -> Dispatch {
        let is_mac = self.registry.is_mac();

        if self.enabled(FeatureCategory::SafeSend) {
            match send_gate::decide(event, ctx, self.composing, is_mac) {
                SendDecision::Send => {
                    self.execute(Action::Send, event);
                    return Dispatch::new(Trigger::Send, EventDisposition::CONSUME);
                }
                SendDecision::Newline => {
                    return Dispatch::new(Trigger::Newline, EventDisposition::STOP_PROPAGATION);
                }
                SendDecision::PassThrough => {}
            }
        }

        if self.enabled(FeatureCategory::VimScroll) {
            for (id, kind) in SCROLL_CANDIDATES {
                if self.matches(id, event) && self.execute(Action::Scroll(kind), event) {
                    if kind.is_linewise() {
                        self.scrolling_key = Some(event.key.clone());
                    }
                    return Dispatch::new(Trigger::Shortcut(id), EventDisposition::CONSUME);
                }
            }
        }

        if self.enabled(FeatureCategory::WideScreen) && self.matches(ShortcutId::ToggleFocus, event)
        {
            self.execute(Action::ToggleFocus, event);
            return Dispatch::new(
                Trigger::Shortcut(ShortcutId::ToggleFocus),
                EventDisposition::PREVENT_DEFAULT,
            );
        }

        if self.matches(ShortcutId::ToggleShortcuts, event) {
            if self.handler.help_visible() {
                self.handler.close_help();
            } else {
                let panel = self.help_panel();
                self.handler.show_help(panel);
            }
            return Dispatch::new(
                Trigger::Shortcut(ShortcutId::ToggleShortcuts),
                EventDisposition::CONSUME,
            );
        }

        if !self.enabled(FeatureCategory::OtherShortcuts) {
            return Dispatch::IGNORED;
        }

        for (id, action) in CUSTOM_ONLY_CANDIDATES {
            if self
                .registry
                .has_custom_binding(id, &self.settings.shortcuts)
                && self.matches(id, event)
            {
                self.execute(action, event);
                return Dispatch::new(Trigger::Shortcut(id), EventDisposition::CONSUME);
            }
        }

        for (id, action) in MODEL_CANDIDATES {
            if self.matches(id, event) {
                self.execute(action, event);
                return Dispatch::new(Trigger::Shortcut(id), EventDisposition::PREVENT_DEFAULT);
            }
        }

        Dispatch::IGNORED
    }

    fn enabled(&self, category: FeatureCategory) -> bool {
        self.settings.feature_toggles.is_enabled(category)
    }

    fn matches(&self, id: ShortcutId, event: &KeyEvent) -> bool {
        matches_any(
            self.registry.effective_bindings(id, &self.settings.shortcuts),
            event,
            self.registry.is_mac(),
        )
    }

    /// Run `action`; false only when the handler declined it.
    ///
    /// Failures are reported to the user and count as handled.
    fn execute(&mut self, action: Action, event: &KeyEvent) -> bool {
        match self.handler.perform(action, event) {
            Ok(handled) => {
                if !handled {
                    log::debug!("Handler declined {:?}", action);
                }
                handled
            }
            Err(err) => {
                log::error!("Action {:?} failed: {}", action, err);
                let key = err.message().unwrap_or(action.failure_message());
                let message = self.messages.text(key);
                self.handler.notify(&message, NotifyLevel::Error);
                true
            }
        }
    }

    fn stop_scrolling(&mut self) {
        self.handler.stop_continuous_scroll();
        self.scrolling_key = None;
    }
}
