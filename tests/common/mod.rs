//! Shared integration test helpers for chatkeys.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` below keeps files that use only some helpers quiet.

#![allow(dead_code)]

use chatkeys::automation::{DriverError, PageDriver, Target};
use chatkeys::engine::{
    Action, ActionError, ActionHandler, NotifyLevel, ScrollMetrics, ScrollMotion, plan_scroll,
};
use chatkeys::help::HelpPanel;
use chatkeys_keybindings::KeyEvent;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Handler that records everything the engine asks of it.
#[derive(Default)]
pub struct Recorder {
    pub performed: Vec<Action>,
    /// Scroll requests answer "not handled".
    pub decline_scroll: bool,
    pub fail_with: Option<ActionError>,
    pub help: Option<HelpPanel>,
    pub stops: usize,
    pub notices: Vec<(String, NotifyLevel)>,
    /// Page geometry; when set, scroll actions are planned against it.
    pub page: Option<ScrollMetrics>,
    pub motions: Vec<ScrollMotion>,
}

impl Recorder {
    pub fn with_page(page: ScrollMetrics) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

impl ActionHandler for Recorder {
    fn perform(&mut self, action: Action, event: &KeyEvent) -> Result<bool, ActionError> {
        if let Some(err) = self.fail_with.clone() {
            return Err(err);
        }
        if let Action::Scroll(kind) = action {
            if self.decline_scroll {
                return Ok(false);
            }
            if let Some(page) = &self.page {
                self.motions.push(plan_scroll(kind, page, event.repeat));
            }
        }
        self.performed.push(action);
        Ok(true)
    }

    fn stop_continuous_scroll(&mut self) {
        self.stops += 1;
    }

    fn help_visible(&self) -> bool {
        self.help.is_some()
    }

    fn show_help(&mut self, panel: HelpPanel) {
        self.help = Some(panel);
    }

    fn close_help(&mut self) {
        self.help = None;
    }

    fn notify(&mut self, message: &str, level: NotifyLevel) {
        self.notices.push((message.to_string(), level));
    }
}

#[derive(Default)]
struct PageState {
    visible: HashSet<Target>,
    /// Clicking the key target shows the listed targets.
    reveals: Vec<(Target, Vec<Target>)>,
    /// Clicking the key target hides the listed targets.
    hides: Vec<(Target, Vec<Target>)>,
    clicks: Vec<Target>,
    notices: Vec<String>,
}

/// In-memory chat page.
#[derive(Default)]
pub struct MockPage {
    state: Mutex<PageState>,
}

const POLL: Duration = Duration::from_millis(10);

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(self, targets: &[Target]) -> Self {
        self.state.lock().visible.extend(targets.iter().copied());
        self
    }

    pub fn on_click_show(self, clicked: Target, shown: &[Target]) -> Self {
        self.state.lock().reveals.push((clicked, shown.to_vec()));
        self
    }

    pub fn on_click_hide(self, clicked: Target, hidden: &[Target]) -> Self {
        self.state.lock().hides.push((clicked, hidden.to_vec()));
        self
    }

    pub fn clicks(&self) -> Vec<Target> {
        self.state.lock().clicks.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.state.lock().notices.clone()
    }

    /// A page whose selected chat can be deleted through a confirm dialog.
    pub fn chat_page() -> Self {
        MockPage::new()
            .show(&[
                Target::SideNavToggle,
                Target::SideNavOpened,
                Target::ConversationList,
                Target::SelectedChat,
                Target::ChatActionsButton,
            ])
            .on_click_show(Target::ChatActionsButton, &[Target::DeleteButton, Target::PinButton])
    }
}

impl PageDriver for MockPage {
    fn is_visible(&self, target: Target) -> bool {
        self.state.lock().visible.contains(&target)
    }

    fn click(&self, target: Target) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if !state.visible.contains(&target) {
            return Err(DriverError::NotFound(target));
        }
        state.clicks.push(target);
        let shown: Vec<Target> = state
            .reveals
            .iter()
            .filter(|(clicked, _)| *clicked == target)
            .flat_map(|(_, shown)| shown.iter().copied())
            .collect();
        let hidden: Vec<Target> = state
            .hides
            .iter()
            .filter(|(clicked, _)| *clicked == target)
            .flat_map(|(_, hidden)| hidden.iter().copied())
            .collect();
        state.visible.extend(shown);
        for target in hidden {
            state.visible.remove(&target);
        }
        Ok(())
    }

    async fn wait_for_element(&self, target: Target, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(target) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(target));
            }
            tokio::time::sleep(POLL).await;
        }
    }

    async fn wait_for_removal(&self, target: Target, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_visible(target) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(target));
            }
            tokio::time::sleep(POLL).await;
        }
    }

    fn notify(&self, message: &str, _level: NotifyLevel) {
        self.state.lock().notices.push(message.to_string());
    }
}
