//! Key binding system for chatkeys.
//!
//! This crate resolves user-configurable shortcuts against live key events.
//!
//! Features:
//! - Platform normalization of the canonical `mod` modifier (Cmd or Ctrl)
//! - Matching by abstract key or physical key position
//! - Edit-time validation and conflict detection
//! - Human-readable chord parsing and display formatting

pub mod conflict;
pub mod matcher;
pub mod parser;
pub mod platform;
pub mod registry;
pub mod validator;

pub use conflict::{
    BindingEditError, BindingUpdate, Conflict, assign_binding, check_conflicts, find_host_conflict,
    find_user_conflict,
};
pub use matcher::{KeyEvent, binding_from_event, bindings_equal, matches, matches_any};
pub use parser::{ParseError, binding_tokens, format_binding, parse_binding};
pub use platform::{ModSource, NormalizedBinding, normalize_binding};
pub use registry::{
    HostDefaultShortcut, MessageLookup, NoMessages, ShortcutDefinition, ShortcutRegistry,
    label_message_ids,
};
pub use validator::{InvalidBinding, RejectReason, validate_binding};
