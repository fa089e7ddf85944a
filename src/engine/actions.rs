//! Actions the engine asks its host to perform.

use crate::automation::AutomationError;
use crate::help::HelpPanel;
use crate::i18n::MessageKey;
use chatkeys_keybindings::KeyEvent;
use thiserror::Error;

/// Scroll motion requested by a vim-scroll shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollKind {
    Top,
    Bottom,
    Up,
    Down,
    HalfUp,
    HalfDown,
}

impl ScrollKind {
    /// Line-wise motions that turn into continuous scrolling while held.
    pub fn is_linewise(self) -> bool {
        matches!(self, ScrollKind::Up | ScrollKind::Down)
    }
}

/// Response mode of the chat model a shortcut can switch to.
///
/// `modePro` has a catalog entry but is never dispatched, so it has no mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelMode {
    Instant,
    Thinking,
}

/// Work requested from the host when a shortcut fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Submit the prompt.
    Send,
    Scroll(ScrollKind),
    ToggleFocus,
    UploadFiles,
    PinChat,
    TemporaryChat,
    DeleteChat,
    /// Open the model menu without choosing.
    ToggleModel,
    SelectMode(ModelMode),
}

impl Action {
    /// Toast shown when the action fails without a more specific message.
    pub fn failure_message(self) -> MessageKey {
        match self {
            Action::Send => MessageKey::ToastSendButtonMissing,
            Action::UploadFiles => MessageKey::ToastUploadFailed,
            Action::PinChat => MessageKey::ToastPinFailed,
            Action::TemporaryChat => MessageKey::ToastTempChatFailed,
            Action::DeleteChat => MessageKey::ToastDeleteFailed,
            Action::ToggleModel | Action::SelectMode(_) => MessageKey::ToastModelSwitchFailed,
            Action::Scroll(_) | Action::ToggleFocus => MessageKey::ToastActionFailed,
        }
    }
}

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

/// Failure reported by an [`ActionHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no chat is selected")]
    NoChatSelected,
    #[error("send button is disabled")]
    SendButtonDisabled,
    #[error("another action is still running")]
    Busy,
    #[error("{0} not found")]
    ElementMissing(String),
    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    /// A message more specific than the action's generic failure toast.
    pub fn message(&self) -> Option<MessageKey> {
        match self {
            ActionError::NoChatSelected => Some(MessageKey::ToastNoChatSelected),
            ActionError::SendButtonDisabled => Some(MessageKey::ToastSendButtonDisabled),
            ActionError::Busy => Some(MessageKey::ToastActionBusy),
            ActionError::ElementMissing(_) | ActionError::Failed(_) => None,
        }
    }
}

impl From<AutomationError> for ActionError {
    fn from(err: AutomationError) -> Self {
        match err {
            AutomationError::Busy => ActionError::Busy,
            AutomationError::NoSelection => ActionError::NoChatSelected,
            other => ActionError::Failed(other.to_string()),
        }
    }
}

/// How the host should treat the original key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventDisposition {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventDisposition {
    /// Leave the event alone.
    pub const NONE: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };
    /// Swallow the event entirely.
    pub const CONSUME: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };
    /// Let the browser act but hide the event from page handlers.
    pub const STOP_PROPAGATION: Self = Self {
        prevent_default: false,
        stop_propagation: true,
    };
}

/// Host side of the engine.
///
/// `perform` returns `Ok(false)` to decline an action. Only scroll actions
/// honour a decline: the engine then tries the next candidate shortcut.
pub trait ActionHandler {
    fn perform(&mut self, action: Action, event: &KeyEvent) -> Result<bool, ActionError>;

    /// Stop any continuous scroll started by a held key.
    fn stop_continuous_scroll(&mut self) {}

    /// Whether the shortcut help panel is on screen.
    fn help_visible(&self) -> bool {
        false
    }

    /// Show the help panel, replacing its content if already visible.
    fn show_help(&mut self, panel: HelpPanel);

    fn close_help(&mut self);

    fn notify(&mut self, message: &str, level: NotifyLevel);
}
