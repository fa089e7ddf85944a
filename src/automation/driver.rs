//! Page capabilities needed by automation sequences.

use crate::engine::{ModelMode, NotifyLevel};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A logical element of the chat page.
///
/// Drivers map each target to whatever lookup their page needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    SideNavToggle,
    /// The side navigation in its opened state.
    SideNavOpened,
    ConversationList,
    SelectedChat,
    /// Overflow menu button of the selected chat.
    ChatActionsButton,
    DeleteButton,
    PinButton,
    ConfirmDialog,
    ConfirmButton,
    TemporaryChatButton,
    ModelMenuButton,
    ModelMenu,
    ModelOption(ModelMode),
    UploadMenuButton,
    UploadMenu,
    UploadFilesButton,
    PromptInput,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::SideNavToggle => f.write_str("side nav toggle"),
            Target::SideNavOpened => f.write_str("opened side nav"),
            Target::ConversationList => f.write_str("conversation list"),
            Target::SelectedChat => f.write_str("selected chat"),
            Target::ChatActionsButton => f.write_str("chat actions button"),
            Target::DeleteButton => f.write_str("delete button"),
            Target::PinButton => f.write_str("pin button"),
            Target::ConfirmDialog => f.write_str("confirm dialog"),
            Target::ConfirmButton => f.write_str("confirm button"),
            Target::TemporaryChatButton => f.write_str("temporary chat button"),
            Target::ModelMenuButton => f.write_str("model menu button"),
            Target::ModelMenu => f.write_str("model menu"),
            Target::ModelOption(mode) => write!(f, "{:?} model option", mode),
            Target::UploadMenuButton => f.write_str("upload menu button"),
            Target::UploadMenu => f.write_str("upload menu"),
            Target::UploadFilesButton => f.write_str("upload files button"),
            Target::PromptInput => f.write_str("prompt input"),
        }
    }
}

/// Failure reported by a [`PageDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("{0} not found")]
    NotFound(Target),
    #[error("timed out waiting for {0}")]
    Timeout(Target),
    #[error("{0}")]
    Other(String),
}

/// Access to the live page.
///
/// Waits receive their timeout so drivers can stop polling early; the runner
/// enforces the same bound on its side as well.
pub trait PageDriver: Send + Sync + 'static {
    fn is_visible(&self, target: Target) -> bool;

    fn click(&self, target: Target) -> Result<(), DriverError>;

    /// Resolve once `target` is present.
    fn wait_for_element(
        &self,
        target: Target,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Resolve once `target` is gone.
    fn wait_for_removal(
        &self,
        target: Target,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), DriverError>> + Send;

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    /// Show a toast.
    fn notify(&self, message: &str, level: NotifyLevel);
}
