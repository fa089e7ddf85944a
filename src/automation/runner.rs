//! Sequence execution on the Tokio runtime.

use super::AutomationError;
use super::driver::{DriverError, PageDriver, Target};
use super::sequence::{Fallback, Sequence, SequenceState, Step, StepKind};
use crate::engine::NotifyLevel;
use crate::i18n::{MessageKey, Messages};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::timeout;

#[derive(Debug, Default)]
struct GateState {
    /// Set while a sequence runs; expires so a stuck run cannot block forever.
    busy_until: Option<Instant>,
    cooldown_until: Option<Instant>,
    /// Bumped on every acquire; only the current holder may release.
    generation: u64,
}

/// Admits one sequence at a time.
///
/// A trigger while busy or cooling down is rejected, never queued.
#[derive(Debug, Clone, Default)]
pub struct BusyGate {
    state: Arc<Mutex<GateState>>,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate for at most `hold`, returning the holder's generation.
    pub fn try_acquire(&self, now: Instant, hold: Duration) -> Option<u64> {
        let mut state = self.state.lock();
        if state.busy_until.is_some_and(|until| now < until)
            || state.cooldown_until.is_some_and(|until| now < until)
        {
            return None;
        }
        state.generation = state.generation.wrapping_add(1);
        state.busy_until = Some(now + hold);
        state.cooldown_until = None;
        Some(state.generation)
    }

    /// Open the gate again after `cooldown`.
    ///
    /// A release from a holder whose hold expired and was taken over is
    /// ignored.
    pub fn release(&self, generation: u64, now: Instant, cooldown: Duration) {
        let mut state = self.state.lock();
        if state.generation != generation {
            log::debug!(
                "Ignoring stale gate release (generation {}, current {})",
                generation,
                state.generation
            );
            return;
        }
        state.busy_until = None;
        state.cooldown_until = (!cooldown.is_zero()).then(|| now + cooldown);
    }

    pub fn is_busy(&self, now: Instant) -> bool {
        let state = self.state.lock();
        state.busy_until.is_some_and(|until| now < until)
            || state.cooldown_until.is_some_and(|until| now < until)
    }
}

/// How a single step went wrong.
enum StepFailure {
    TimedOut(Target),
    Driver(DriverError),
}

/// Runs sequences against one page.
pub struct AutomationRunner<D: PageDriver> {
    driver: Arc<D>,
    messages: Arc<Messages>,
    gate: BusyGate,
    state: Arc<Mutex<SequenceState>>,
    cancelled: Arc<AtomicBool>,
}

impl<D: PageDriver> AutomationRunner<D> {
    pub fn new(driver: Arc<D>, messages: Messages) -> Self {
        Self {
            driver,
            messages: Arc::new(messages),
            gate: BusyGate::new(),
            state: Arc::new(Mutex::new(SequenceState::Idle)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a gate with other runners.
    pub fn with_gate(mut self, gate: BusyGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> &BusyGate {
        &self.gate
    }

    /// State of the current or last sequence.
    pub fn state(&self) -> SequenceState {
        *self.state.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy(Instant::now())
    }

    /// Ask the running sequence to stop before its next step.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Start `sequence` in the background.
    ///
    /// Must be called from within a Tokio runtime. Failures inside the
    /// sequence are shown as a toast through the driver.
    pub fn trigger(
        &self,
        sequence: Sequence,
    ) -> Result<JoinHandle<Result<(), AutomationError>>, AutomationError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| AutomationError::NoRuntime)?;

        let Some(generation) = self.gate.try_acquire(Instant::now(), sequence.time_budget()) else {
            log::info!("Rejected {}: another sequence is running", sequence.name());
            return Err(AutomationError::Busy);
        };

        self.cancelled.store(false, Ordering::SeqCst);
        *self.state.lock() = SequenceState::Idle;

        let driver = Arc::clone(&self.driver);
        let messages = Arc::clone(&self.messages);
        let gate = self.gate.clone();
        let state = Arc::clone(&self.state);
        let cancelled = Arc::clone(&self.cancelled);

        Ok(handle.spawn(async move {
            let result = execute(&sequence, driver.as_ref(), &state, &cancelled).await;
            gate.release(generation, Instant::now(), sequence.cooldown());

            match &result {
                Ok(()) => log::info!("{} completed", sequence.name()),
                Err(AutomationError::Cancelled) => log::info!("{} cancelled", sequence.name()),
                Err(err) => {
                    log::error!("{} failed: {}", sequence.name(), err);
                    let key = match err {
                        AutomationError::NoSelection => MessageKey::ToastNoChatSelected,
                        _ => sequence.failure_message(),
                    };
                    driver.notify(&messages.text(key), NotifyLevel::Error);
                }
            }
            result
        }))
    }

    /// Run `sequence` to completion.
    pub async fn run(&self, sequence: Sequence) -> Result<(), AutomationError> {
        let task = self.trigger(sequence)?;
        match task.await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Automation task ended abnormally: {}", e);
                Err(AutomationError::Cancelled)
            }
        }
    }
}

async fn execute<D: PageDriver>(
    sequence: &Sequence,
    driver: &D,
    state: &Mutex<SequenceState>,
    cancelled: &AtomicBool,
) -> Result<(), AutomationError> {
    log::debug!("Starting {} ({} steps)", sequence.name(), sequence.steps().len());
    let mut seen: Vec<Target> = Vec::new();

    for step in sequence.steps() {
        if cancelled.load(Ordering::SeqCst) {
            *state.lock() = SequenceState::Failed;
            return Err(AutomationError::Cancelled);
        }
        {
            let mut current = state.lock();
            if *current != step.state {
                log::debug!("{}: {} -> {}", sequence.name(), *current, step.state);
                *current = step.state;
            }
        }

        if let Err(failure) = run_step(step, driver, &mut seen).await {
            match step.fallback {
                Fallback::Fail => {
                    *state.lock() = SequenceState::Failed;
                    return Err(step_error(step.state, failure));
                }
                Fallback::Skip => {
                    log::debug!("{}: skipped {:?}", sequence.name(), step.kind);
                }
                Fallback::SleepThenContinue(pause) => driver.sleep(pause).await,
            }
        }
    }

    *state.lock() = SequenceState::Done;
    Ok(())
}

fn step_error(state: SequenceState, failure: StepFailure) -> AutomationError {
    match failure {
        StepFailure::TimedOut(Target::SelectedChat)
        | StepFailure::Driver(
            DriverError::NotFound(Target::SelectedChat) | DriverError::Timeout(Target::SelectedChat),
        ) => {
            AutomationError::NoSelection
        }
        StepFailure::TimedOut(target) | StepFailure::Driver(DriverError::Timeout(target)) => {
            AutomationError::Timeout { state, target }
        }
        StepFailure::Driver(err) => AutomationError::Driver(err.to_string()),
    }
}

async fn run_step<D: PageDriver>(
    step: &Step,
    driver: &D,
    seen: &mut Vec<Target>,
) -> Result<(), StepFailure> {
    match step.kind {
        StepKind::Click(target) => driver.click(target).map_err(StepFailure::Driver),
        StepKind::Sleep(pause) => {
            driver.sleep(pause).await;
            Ok(())
        }
        StepKind::WaitFor(target) => {
            let first = wait_for(driver, target, step.timeout).await;
            let result = match (first, step.retry_after) {
                (Err(_), Some(pause)) => {
                    driver.sleep(pause).await;
                    wait_for(driver, target, step.timeout).await
                }
                (first, _) => first,
            };
            if result.is_ok() {
                seen.push(target);
            }
            result
        }
        StepKind::WaitForRemoval(target) => {
            if !seen.contains(&target) {
                return Err(StepFailure::Driver(DriverError::NotFound(target)));
            }
            match timeout(step.timeout, driver.wait_for_removal(target, step.timeout)).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(StepFailure::Driver(e)),
                Err(_) => Err(StepFailure::TimedOut(target)),
            }
        }
        StepKind::Open { toggle, opened } => {
            if !driver.is_visible(opened) {
                if !driver.is_visible(toggle) {
                    return Err(StepFailure::Driver(DriverError::NotFound(toggle)));
                }
                driver.click(toggle).map_err(StepFailure::Driver)?;
                wait_for(driver, opened, step.timeout).await?;
            }
            seen.push(opened);
            Ok(())
        }
        StepKind::Close { toggle, opened } => {
            if driver.is_visible(opened) && driver.is_visible(toggle) {
                driver.click(toggle).map_err(StepFailure::Driver)?;
            }
            Ok(())
        }
    }
}

async fn wait_for<D: PageDriver>(
    driver: &D,
    target: Target,
    limit: Duration,
) -> Result<(), StepFailure> {
    match timeout(limit, driver.wait_for_element(target, limit)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(StepFailure::Driver(e)),
        Err(_) => Err(StepFailure::TimedOut(target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_while_busy() {
        let gate = BusyGate::new();
        let start = Instant::now();
        assert!(gate.try_acquire(start, Duration::from_secs(5)).is_some());
        assert!(gate.try_acquire(start + Duration::from_secs(1), Duration::from_secs(5)).is_none());
        assert!(gate.is_busy(start));
    }

    #[test]
    fn test_gate_busy_flag_expires() {
        let gate = BusyGate::new();
        let start = Instant::now();
        assert!(gate.try_acquire(start, Duration::from_millis(100)).is_some());
        assert!(
            gate.try_acquire(start + Duration::from_millis(150), Duration::from_millis(100))
                .is_some()
        );
    }

    #[test]
    fn test_gate_cooldown() {
        let gate = BusyGate::new();
        let start = Instant::now();
        let generation = gate.try_acquire(start, Duration::from_secs(5)).unwrap();
        gate.release(generation, start, Duration::from_millis(1200));
        assert!(gate.try_acquire(start + Duration::from_millis(500), Duration::from_secs(5)).is_none());
        assert!(gate.try_acquire(start + Duration::from_millis(1300), Duration::from_secs(5)).is_some());
    }

    #[test]
    fn test_overrun_release_keeps_new_holder() {
        let gate = BusyGate::new();
        let start = Instant::now();
        let first = gate.try_acquire(start, Duration::from_millis(100)).unwrap();

        // First run overran its hold; a second run takes the gate.
        let later = start + Duration::from_millis(150);
        let second = gate.try_acquire(later, Duration::from_secs(5)).unwrap();
        assert_ne!(first, second);

        gate.release(first, later + Duration::from_millis(10), Duration::ZERO);
        assert!(gate.is_busy(later + Duration::from_millis(20)));
        assert!(gate.try_acquire(later + Duration::from_millis(20), Duration::from_secs(5)).is_none());

        gate.release(second, later + Duration::from_millis(30), Duration::ZERO);
        assert!(!gate.is_busy(later + Duration::from_millis(40)));
    }

    #[test]
    fn test_step_error_mapping() {
        assert_eq!(
            step_error(
                SequenceState::MenuOpening,
                StepFailure::TimedOut(Target::SelectedChat)
            ),
            AutomationError::NoSelection
        );
        assert_eq!(
            step_error(
                SequenceState::ItemSelecting,
                StepFailure::TimedOut(Target::PinButton)
            ),
            AutomationError::Timeout {
                state: SequenceState::ItemSelecting,
                target: Target::PinButton
            }
        );
        assert!(matches!(
            step_error(
                SequenceState::Confirming,
                StepFailure::Driver(DriverError::Other("detached".into()))
            ),
            AutomationError::Driver(_)
        ));
    }

    #[test]
    fn test_trigger_outside_runtime() {
        struct NoPage;
        impl PageDriver for NoPage {
            fn is_visible(&self, _target: Target) -> bool {
                false
            }
            fn click(&self, target: Target) -> Result<(), DriverError> {
                Err(DriverError::NotFound(target))
            }
            async fn wait_for_element(
                &self,
                target: Target,
                _timeout: Duration,
            ) -> Result<(), DriverError> {
                Err(DriverError::NotFound(target))
            }
            async fn wait_for_removal(
                &self,
                _target: Target,
                _timeout: Duration,
            ) -> Result<(), DriverError> {
                Ok(())
            }
            fn notify(&self, _message: &str, _level: NotifyLevel) {}
        }

        let runner = AutomationRunner::new(Arc::new(NoPage), Messages::new());
        assert_eq!(
            runner.trigger(Sequence::pin_chat()).unwrap_err(),
            AutomationError::NoRuntime
        );
        assert!(!runner.is_busy());
    }
}
