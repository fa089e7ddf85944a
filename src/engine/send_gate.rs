//! Enter-to-send gate.
//!
//! With the gate on, plain Enter in the prompt inserts a newline and only the
//! platform send chord submits: Cmd+Enter or Ctrl+Enter on macOS, Ctrl+Enter
//! without Meta elsewhere.

use super::KeyContext;
use chatkeys_keybindings::KeyEvent;

/// What the gate decided for one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDecision {
    /// Not the gate's business; dispatch continues.
    PassThrough,
    /// Submit the prompt.
    Send,
    /// Insert a newline natively and hide the key from the page.
    Newline,
}

/// Key value some browsers report while an IME is converting.
const IME_PROCESS_KEY: &str = "Process";

pub fn decide(event: &KeyEvent, ctx: &KeyContext, ime_active: bool, is_mac: bool) -> SendDecision {
    if !ctx.editable_target {
        return SendDecision::PassThrough;
    }
    if ime_active || event.is_composing || event.key == IME_PROCESS_KEY {
        return SendDecision::PassThrough;
    }
    if event.key != "Enter" {
        return SendDecision::PassThrough;
    }

    let send_chord = if is_mac {
        event.meta || event.ctrl
    } else {
        event.ctrl && !event.meta
    };
    if send_chord {
        return SendDecision::Send;
    }

    // Native Shift+Enter keeps IME input intact.
    if event.shift && !event.ctrl && !event.meta {
        return SendDecision::PassThrough;
    }

    SendDecision::Newline
}
