//! Step plans for multi-step page interactions.
//!
//! A sequence is a list of steps, each tagged with the state it belongs to
//! and carrying its own timeout and fallback. The plans below mirror what a
//! user would click through by hand.

use super::driver::Target;
use crate::engine::ModelMode;
use crate::i18n::MessageKey;
use std::fmt;
use std::time::Duration;

const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub const DEFAULT_WAIT: Duration = ms(6000);

const SIDE_NAV_OPEN_CONFIRM: Duration = ms(1000);
const SIDE_NAV_CLOSE_SETTLE: Duration = ms(120);
const CONVERSATION_LIST: Duration = ms(2200);
const SELECTED_CHAT: Duration = ms(1200);
const ACTIONS_BUTTON: Duration = ms(800);
const ACTIONS_BUTTON_RETRY: Duration = ms(120);
const MENU_ITEM: Duration = ms(1500);
const DIALOG: Duration = ms(2500);
const DIALOG_REMOVAL: Duration = ms(1500);
const NO_DIALOG_SETTLE: Duration = ms(200);
const MODEL_OPTION: Duration = ms(2000);
const MODEL_OPTION_SETTLE: Duration = ms(100);
const MODEL_MENU_REMOVAL: Duration = ms(1500);
const MODEL_FOCUS_SETTLE: Duration = ms(200);
const UPLOAD_MENU: Duration = ms(2500);
const UPLOAD_COOLDOWN: Duration = ms(1200);

/// Where a sequence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceState {
    Idle,
    MenuOpening,
    ItemSelecting,
    Confirming,
    Closing,
    Done,
    Failed,
}

impl SequenceState {
    pub fn is_finished(self) -> bool {
        matches!(self, SequenceState::Done | SequenceState::Failed)
    }
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequenceState::Idle => "idle",
            SequenceState::MenuOpening => "menu opening",
            SequenceState::ItemSelecting => "item selecting",
            SequenceState::Confirming => "confirming",
            SequenceState::Closing => "closing",
            SequenceState::Done => "done",
            SequenceState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What to do when a step cannot complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Abort the sequence.
    Fail,
    /// Carry on with the next step.
    Skip,
    /// Pause, then carry on.
    SleepThenContinue(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Click(Target),
    WaitFor(Target),
    /// Wait for a target seen earlier in the run to disappear. A target
    /// that never appeared counts as a failed wait.
    WaitForRemoval(Target),
    /// Click `toggle` unless `opened` is already visible, then wait for it.
    Open { toggle: Target, opened: Target },
    /// Click `toggle` if `opened` is visible.
    Close { toggle: Target, opened: Target },
    Sleep(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: SequenceState,
    pub kind: StepKind,
    pub timeout: Duration,
    pub fallback: Fallback,
    /// Retry a failed wait once after this pause.
    pub retry_after: Option<Duration>,
}

impl Step {
    pub fn new(state: SequenceState, kind: StepKind) -> Self {
        Self {
            state,
            kind,
            timeout: DEFAULT_WAIT,
            fallback: Fallback::Fail,
            retry_after: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn retry_after(mut self, pause: Duration) -> Self {
        self.retry_after = Some(pause);
        self
    }

    /// Longest time this step can take.
    fn budget(&self) -> Duration {
        let wait = match self.kind {
            StepKind::Click(_) | StepKind::Close { .. } => Duration::ZERO,
            StepKind::Sleep(pause) => pause,
            StepKind::WaitFor(_) | StepKind::WaitForRemoval(_) | StepKind::Open { .. } => {
                match self.retry_after {
                    Some(pause) => self.timeout * 2 + pause,
                    None => self.timeout,
                }
            }
        };
        let fallback = match self.fallback {
            Fallback::SleepThenContinue(pause) => pause,
            Fallback::Fail | Fallback::Skip => Duration::ZERO,
        };
        wait + fallback
    }
}

/// A named plan of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: &'static str,
    steps: Vec<Step>,
    failure: MessageKey,
    cooldown: Duration,
}

use SequenceState::{Closing, Confirming, ItemSelecting, MenuOpening};

fn open_side_nav() -> Step {
    Step::new(
        MenuOpening,
        StepKind::Open {
            toggle: Target::SideNavToggle,
            opened: Target::SideNavOpened,
        },
    )
    .timeout(SIDE_NAV_OPEN_CONFIRM)
    .fallback(Fallback::Skip)
}

fn close_side_nav() -> [Step; 2] {
    [
        Step::new(
            Closing,
            StepKind::Close {
                toggle: Target::SideNavToggle,
                opened: Target::SideNavOpened,
            },
        )
        .fallback(Fallback::Skip),
        Step::new(Closing, StepKind::Sleep(SIDE_NAV_CLOSE_SETTLE)),
    ]
}

/// Side nav open, selected chat found, its actions menu clicked.
fn open_chat_actions() -> Vec<Step> {
    vec![
        open_side_nav(),
        Step::new(MenuOpening, StepKind::WaitFor(Target::ConversationList))
            .timeout(CONVERSATION_LIST),
        Step::new(MenuOpening, StepKind::WaitFor(Target::SelectedChat)).timeout(SELECTED_CHAT),
        Step::new(MenuOpening, StepKind::WaitFor(Target::ChatActionsButton))
            .timeout(ACTIONS_BUTTON)
            .retry_after(ACTIONS_BUTTON_RETRY),
        Step::new(MenuOpening, StepKind::Click(Target::ChatActionsButton)),
    ]
}

impl Sequence {
    pub fn new(name: &'static str, failure: MessageKey, steps: Vec<Step>) -> Self {
        Self {
            name,
            steps,
            failure,
            cooldown: Duration::ZERO,
        }
    }

    /// Keep the gate closed for `cooldown` after the sequence ends.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn delete_chat() -> Self {
        let mut steps = open_chat_actions();
        steps.extend([
            Step::new(ItemSelecting, StepKind::WaitFor(Target::DeleteButton)).timeout(MENU_ITEM),
            Step::new(ItemSelecting, StepKind::Click(Target::DeleteButton)),
            Step::new(Confirming, StepKind::WaitFor(Target::ConfirmDialog))
                .timeout(DIALOG)
                .fallback(Fallback::Skip),
            Step::new(Confirming, StepKind::WaitFor(Target::ConfirmButton)).timeout(DIALOG),
            Step::new(Confirming, StepKind::Click(Target::ConfirmButton)),
            Step::new(Confirming, StepKind::WaitForRemoval(Target::ConfirmDialog))
                .timeout(DIALOG_REMOVAL)
                .fallback(Fallback::SleepThenContinue(NO_DIALOG_SETTLE)),
        ]);
        steps.extend(close_side_nav());
        Self::new("delete chat", MessageKey::ToastDeleteFailed, steps)
    }

    pub fn pin_chat() -> Self {
        let mut steps = open_chat_actions();
        steps.extend([
            Step::new(ItemSelecting, StepKind::WaitFor(Target::PinButton)).timeout(MENU_ITEM),
            Step::new(ItemSelecting, StepKind::Click(Target::PinButton)),
        ]);
        Self::new("pin chat", MessageKey::ToastPinFailed, steps)
    }

    pub fn temporary_chat() -> Self {
        let mut steps = vec![
            open_side_nav(),
            Step::new(ItemSelecting, StepKind::WaitFor(Target::TemporaryChatButton))
                .timeout(MENU_ITEM),
            Step::new(ItemSelecting, StepKind::Click(Target::TemporaryChatButton)),
        ];
        steps.extend(close_side_nav());
        Self::new("temporary chat", MessageKey::ToastTempChatFailed, steps)
    }

    /// Open the model menu and, with a mode, pick it.
    pub fn select_model(mode: Option<ModelMode>) -> Self {
        let mut steps = vec![
            Step::new(
                MenuOpening,
                StepKind::Open {
                    toggle: Target::ModelMenuButton,
                    opened: Target::ModelMenu,
                },
            )
            .timeout(MODEL_OPTION),
        ];
        if let Some(mode) = mode {
            let option = Target::ModelOption(mode);
            steps.extend([
                Step::new(ItemSelecting, StepKind::WaitFor(option)).timeout(MODEL_OPTION),
                Step::new(ItemSelecting, StepKind::Sleep(MODEL_OPTION_SETTLE)),
                Step::new(ItemSelecting, StepKind::Click(option)),
                Step::new(Closing, StepKind::WaitForRemoval(Target::ModelMenu))
                    .timeout(MODEL_MENU_REMOVAL)
                    .fallback(Fallback::Skip),
                Step::new(Closing, StepKind::Sleep(MODEL_FOCUS_SETTLE)),
                Step::new(Closing, StepKind::Click(Target::PromptInput)).fallback(Fallback::Skip),
            ]);
        }
        Self::new("select model", MessageKey::ToastModelSwitchFailed, steps)
    }

    pub fn upload_files() -> Self {
        let steps = vec![
            Step::new(MenuOpening, StepKind::Click(Target::UploadMenuButton)),
            Step::new(MenuOpening, StepKind::WaitFor(Target::UploadMenu))
                .timeout(UPLOAD_MENU)
                .fallback(Fallback::Skip),
            Step::new(ItemSelecting, StepKind::WaitFor(Target::UploadFilesButton))
                .timeout(UPLOAD_MENU),
            Step::new(ItemSelecting, StepKind::Click(Target::UploadFilesButton)),
        ];
        Self::new("upload files", MessageKey::ToastUploadFailed, steps).with_cooldown(UPLOAD_COOLDOWN)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Toast shown when the sequence fails.
    pub fn failure_message(&self) -> MessageKey {
        self.failure
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Worst-case running time, used as the busy-gate expiry.
    pub fn time_budget(&self) -> Duration {
        self.steps.iter().map(Step::budget).sum()
    }
}
