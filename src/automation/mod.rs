//! Multi-step UI automation.
//!
//! Some shortcuts need several clicks on the page with waits in between
//! (open the side nav, find the selected chat, open its menu, ...). Each of
//! these is a [`Sequence`] run by an [`AutomationRunner`] on Tokio after the
//! key dispatch has already returned. A [`BusyGate`] admits one run at a
//! time.

pub mod driver;
pub mod runner;
pub mod sequence;

pub use driver::{DriverError, PageDriver, Target};
pub use runner::{AutomationRunner, BusyGate};
pub use sequence::{Fallback, Sequence, SequenceState, Step, StepKind};

use thiserror::Error;

/// Why a sequence did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomationError {
    #[error("another action is still running")]
    Busy,

    #[error("timed out while {state}: {target} did not appear")]
    Timeout { state: SequenceState, target: Target },

    #[error("no chat is selected")]
    NoSelection,

    #[error("sequence was cancelled")]
    Cancelled,

    #[error("page driver error: {0}")]
    Driver(String),

    #[error("no async runtime is available")]
    NoRuntime,
}
